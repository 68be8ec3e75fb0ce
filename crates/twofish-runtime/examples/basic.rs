//! Derives a schedule, encrypts a short message and decrypts it back.

use twofish_runtime::{buffer, Schedule};

fn main() -> Result<(), twofish_runtime::Error> {
    let schedule = Schedule::new(b"an example 128b!")?;

    let message = b"first block heresecond part";
    let ciphertext = buffer::encrypt_to_vec(&schedule, message)?;
    // 27 bytes of input become two whole blocks.
    assert_eq!(ciphertext.len(), 32);

    let decrypted = buffer::decrypt_to_vec(&schedule, &ciphertext);
    assert_eq!(&decrypted[..message.len()], &message[..]);

    println!("example succeeded; {} bytes round-tripped", message.len());
    Ok(())
}
