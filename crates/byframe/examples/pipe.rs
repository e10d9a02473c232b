//! Stream frames across a socket pair: a writer thread sends, the scanner reads.

#[cfg(unix)]
fn main() -> byframe::Result<()> {
    use std::os::unix::net::UnixStream;

    use byframe::{FrameWriter, Scanner};

    let (left, right) = UnixStream::pair()?;

    let producer = std::thread::spawn(move || -> byframe::Result<()> {
        let mut writer = FrameWriter::new(left);
        for i in 0..5 {
            writer.send(format!("message {i}").as_bytes())?;
        }
        writer.send_tuple(&[b"Jack", b"Black"])?;
        Ok(())
    });

    let mut scanner = Scanner::new(right);
    while scanner.scan() {
        println!("{}", String::from_utf8_lossy(scanner.frame()));
    }

    producer
        .join()
        .map_err(|_| std::io::Error::other("producer panicked"))??;
    match scanner.take_err() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

#[cfg(not(unix))]
fn main() {
    eprintln!("this example needs unix domain sockets");
}
