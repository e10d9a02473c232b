//! Fixed-arity tuples of byte spans packed into one buffer.
//!
//! ```text
//! ┌──────────┬─────────┬─────┬──────────┬─────────┬───────────────┐
//! │ A header │ A bytes │ ... │ N header │ N bytes │ last bytes    │
//! └──────────┴─────────┴─────┴──────────┴─────────┴───────────────┘
//! ```
//!
//! The last span has no header and runs to the end of the buffer, so both
//! sides must agree on the arity. There is no corruption detection at this
//! level.

use crate::codec::{decode, frame_len};
use crate::error::Result;
use crate::header::Header;

/// Pack `items` into one buffer.
///
/// An empty tuple encodes as a single zero byte.
pub fn encode_tuple(items: &[&[u8]]) -> Vec<u8> {
    let Some((last, framed)) = items.split_last() else {
        return vec![0];
    };

    let size = framed.iter().map(|item| frame_len(item.len())).sum::<usize>() + last.len();
    let mut out = Vec::with_capacity(size);
    for item in framed {
        out.extend_from_slice(&Header::from_length(item.len()));
        out.extend_from_slice(item);
    }
    out.extend_from_slice(last);
    out
}

/// Unpack `data` into `items`, one borrowed span per slot.
///
/// On error the slots already filled are left as decoded and the rest are
/// untouched.
pub fn decode_tuple_into<'a>(mut data: &'a [u8], items: &mut [&'a [u8]]) -> Result<()> {
    let Some((last, framed)) = items.split_last_mut() else {
        return Ok(());
    };

    for slot in framed {
        let (item, consumed) = decode(data)?;
        *slot = item;
        data = &data[consumed..];
    }
    *last = data;
    Ok(())
}

/// Unpack a tuple whose arity is known at compile time.
pub fn decode_tuple<const N: usize>(data: &[u8]) -> Result<[&[u8]; N]> {
    let mut items: [&[u8]; N] = [&[][..]; N];
    decode_tuple_into(data, &mut items)?;
    Ok(items)
}

/// Unpack a tuple whose arity is only known at runtime.
pub fn decode_tuple_vec(data: &[u8], arity: usize) -> Result<Vec<&[u8]>> {
    let mut items: Vec<&[u8]> = vec![&[][..]; arity];
    decode_tuple_into(data, &mut items)?;
    Ok(items)
}
