//! Command-line interface for the Twofish workspace.

#![forbid(unsafe_code)]

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use rand::{CryptoRng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use twofish_core::{
    decrypt_block, encrypt_block, expand_key, self_test, Key, Schedule, BLOCK_SIZE,
};
use twofish_gen::ScheduleImage;
use twofish_runtime::buffer;

/// Twofish CLI.
#[derive(Parser)]
#[command(name = "twofish", version, author, about = "Twofish block cipher CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Where the schedule for `enc` / `dec` comes from.
#[derive(Args)]
#[group(required = true, multiple = false)]
struct ScheduleSource {
    /// Key as 16, 32, 48 or 64 hex characters.
    #[arg(long, value_name = "HEX")]
    key_hex: Option<String>,
    /// Path to a schedule image written by `gen`.
    #[arg(long, value_name = "FILE")]
    schedule: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive a schedule image from a key.
    Gen {
        /// Key as 16, 32, 48 or 64 hex characters.
        #[arg(long, value_name = "HEX")]
        key_hex: String,
        /// Output path for the serialized image.
        #[arg(long, value_name = "FILE")]
        out: PathBuf,
    },
    /// Encrypt a file block by block; a short tail is filled with 0xFF.
    Enc {
        #[command(flatten)]
        source: ScheduleSource,
        /// Input plaintext path.
        #[arg(long, value_name = "FILE")]
        input: PathBuf,
        /// Output ciphertext path.
        #[arg(long, value_name = "FILE")]
        output: PathBuf,
    },
    /// Decrypt a file block by block; a trailing partial block is dropped.
    Dec {
        #[command(flatten)]
        source: ScheduleSource,
        /// Input ciphertext path.
        #[arg(long, value_name = "FILE")]
        input: PathBuf,
        /// Output plaintext path.
        #[arg(long, value_name = "FILE")]
        output: PathBuf,
    },
    /// Verify that an image-backed schedule and a key-derived one agree on random blocks.
    Check {
        /// Key as 16, 32, 48 or 64 hex characters.
        #[arg(long, value_name = "HEX")]
        key_hex: String,
        /// Number of random samples to test.
        #[arg(long, default_value_t = 16)]
        samples: usize,
        /// Optional RNG seed for reproducibility.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Run the published known-answer vectors.
    Selftest,
    /// Run a local demo: random key and data, encrypt, decrypt back.
    Demo {
        /// Optional RNG seed for reproducibility.
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Gen { key_hex, out } => cmd_gen(&key_hex, &out),
        Commands::Enc {
            source,
            input,
            output,
        } => cmd_enc(&source, &input, &output),
        Commands::Dec {
            source,
            input,
            output,
        } => cmd_dec(&source, &input, &output),
        Commands::Check {
            key_hex,
            samples,
            seed,
        } => cmd_check(&key_hex, samples, seed),
        Commands::Selftest => cmd_selftest(),
        Commands::Demo { seed } => cmd_demo(seed),
    }
}

fn cmd_gen(key_hex: &str, out: &Path) -> Result<()> {
    let key = parse_key_hex(key_hex)?;
    let image = ScheduleImage::from_key(&key);
    let bytes = image.to_bytes().context("serialize image")?;
    fs::write(out, &bytes).with_context(|| format!("write {}", out.display()))?;
    log::info!(
        "wrote {}-bit schedule image ({} bytes) to {}",
        image.params.key_bits,
        bytes.len(),
        out.display()
    );
    Ok(())
}

fn cmd_enc(source: &ScheduleSource, input_path: &Path, output_path: &Path) -> Result<()> {
    let schedule = load_schedule(source)?;
    let data = fs::read(input_path).with_context(|| format!("read {}", input_path.display()))?;
    let ciphertext = buffer::encrypt_to_vec(&schedule, &data).context("encrypt")?;
    fs::write(output_path, &ciphertext)
        .with_context(|| format!("write {}", output_path.display()))?;
    log::info!(
        "encrypted {} bytes into {} bytes",
        data.len(),
        ciphertext.len()
    );
    Ok(())
}

fn cmd_dec(source: &ScheduleSource, input_path: &Path, output_path: &Path) -> Result<()> {
    let schedule = load_schedule(source)?;
    let data = fs::read(input_path).with_context(|| format!("read {}", input_path.display()))?;
    let tail = data.len() % BLOCK_SIZE;
    if tail != 0 {
        log::warn!("ignoring {tail} trailing bytes that do not form a whole block");
    }
    let plaintext = buffer::decrypt_to_vec(&schedule, &data);
    fs::write(output_path, &plaintext)
        .with_context(|| format!("write {}", output_path.display()))?;
    log::info!("decrypted {} bytes", plaintext.len());
    Ok(())
}

fn cmd_check(key_hex: &str, samples: usize, seed: Option<u64>) -> Result<()> {
    let key = parse_key_hex(key_hex)?;
    let bytes = ScheduleImage::from_key(&key)
        .to_bytes()
        .context("serialize image")?;
    let from_image = ScheduleImage::from_bytes(&bytes)
        .context("deserialize image")?
        .into_schedule();
    let from_key = expand_key(&key);
    let mut rng = seeded_rng(seed);

    for _ in 0..samples {
        let mut block = [0u8; 16];
        rng.fill_bytes(&mut block);
        let expected = encrypt_block(&block, &from_key);
        if encrypt_block(&block, &from_image) != expected {
            bail!("mismatch between image and key-derived schedules");
        }
        if decrypt_block(&expected, &from_image) != block {
            bail!("decryption did not invert encryption");
        }
    }
    println!("{samples} samples ok");
    Ok(())
}

fn cmd_selftest() -> Result<()> {
    self_test().context("known-answer self test")?;
    println!("known-answer self test passed");
    Ok(())
}

fn cmd_demo(seed: Option<u64>) -> Result<()> {
    let mut rng = seeded_rng(seed);
    let mut key_bytes = [0u8; 32];
    rng.fill_bytes(&mut key_bytes);
    let schedule = expand_key(&Key::from(key_bytes));

    let mut data = [0u8; 40];
    rng.fill_bytes(&mut data);
    let ciphertext = buffer::encrypt_to_vec(&schedule, &data).context("encrypt")?;
    let decrypted = buffer::decrypt_to_vec(&schedule, &ciphertext);

    println!("demo key: {}", hex::encode(key_bytes));
    println!("plaintext: {}", hex::encode(data));
    println!("ciphertext: {}", hex::encode(&ciphertext));
    println!("decrypted: {}", hex::encode(&decrypted));
    if decrypted[..data.len()] != data[..] {
        bail!("demo roundtrip failed");
    }
    Ok(())
}

fn parse_key_hex(hex_str: &str) -> Result<Key> {
    let bytes = hex::decode(hex_str.trim()).context("decode key hex")?;
    Key::new(&bytes).context("Twofish key must be 8, 16, 24 or 32 bytes")
}

fn load_schedule(source: &ScheduleSource) -> Result<Schedule> {
    match (&source.key_hex, &source.schedule) {
        (Some(key_hex), _) => Ok(expand_key(&parse_key_hex(key_hex)?)),
        (None, Some(path)) => {
            let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
            let image = ScheduleImage::from_bytes(&bytes).context("deserialize image")?;
            Ok(image.into_schedule())
        }
        (None, None) => bail!("either --key-hex or --schedule is required"),
    }
}

fn seeded_rng(seed: Option<u64>) -> impl RngCore + CryptoRng {
    let mut seed_bytes = [0u8; 32];
    match seed {
        Some(value) => seed_bytes[..8].copy_from_slice(&value.to_le_bytes()),
        None => rand::rngs::OsRng.fill_bytes(&mut seed_bytes),
    }
    ChaCha20Rng::from_seed(seed_bytes)
}
