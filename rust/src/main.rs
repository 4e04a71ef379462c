//! qrbak command line. `backup` exports a key from gpg, encrypts it with
//! AES256 and prints the ciphertext as a grid of QR codes in a PDF, left to
//! right and top to bottom. `restore` joins the scanned text of those codes
//! back into the encrypted key, which `gpg --decrypt` then opens.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use qrbak_rs::config::resolve_config;
use qrbak_rs::gpg::Gpg;
use qrbak_rs::layout::PageSize;
use qrbak_rs::pipeline::{self, BackupRequest, PipelineError};
use qrbak_rs::render::{PdfRenderer, QrEncoder};

#[derive(Parser, Debug)]
#[command(name = "qrbak", version, about = "Durable paper backups of GPG private keys as QR codes")]
struct Cli {
    #[arg(short, long, global = true, help = "Verbose output")]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Export, encrypt and print a private key as a grid of QR codes
    Backup(BackupArgs),
    /// Rebuild the encrypted key from the scanned text of each code
    Restore(RestoreArgs),
}

#[derive(Args, Debug)]
struct BackupArgs {
    #[arg(help = "ID of the GPG key")]
    key_id: String,
    #[arg(help = "Directory in which to save output")]
    out_dir: PathBuf,
    #[arg(long, help = "Number of QR codes to generate [default: 27]")]
    codes: Option<usize>,
    #[arg(long, help = "Number of QR codes per row in the PDF [default: 3]")]
    row: Option<usize>,
    #[arg(long, help = "PDF page size: A3, A4, A5, Letter or Legal [default: Letter]")]
    pagesize: Option<PageSize>,
    #[arg(long, help = "Also save one PNG per QR code")]
    img: bool,
    #[arg(long, help = "Also save the encrypted, base 64-encoded key as a text file")]
    txt: bool,
    #[arg(long, help = "Do not print an i/N label under each code")]
    no_labels: bool,
    #[arg(long, help = "JSON config file; falls back to $QRBAK_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct RestoreArgs {
    #[arg(required = true, help = "Files holding the scanned text of each code, in order")]
    fragments: Vec<PathBuf>,
    #[arg(long, help = "Payload digest from the page footer, full or its first 16 hex characters")]
    digest: Option<String>,
    #[arg(short, long, help = "Write the encrypted key to this file")]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Backup(args) => backup(args),
        Commands::Restore(args) => restore(args),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn backup(args: BackupArgs) -> Result<()> {
    let mut config = resolve_config(args.config.as_deref())?;
    if let Some(codes) = args.codes {
        config.codes = codes;
    }
    if let Some(row) = args.row {
        config.codes_per_row = row;
    }
    if let Some(size) = args.pagesize {
        config.page_size = size;
    }
    config.save_images |= args.img;
    config.save_text |= args.txt;
    config.label_codes &= !args.no_labels;

    // Settings are checked before gpg is touched.
    config.validate()?;
    let layout_config = config.layout_config()?;

    let gpg = Gpg::new(config.gpg_program.clone());
    if !gpg.installed() {
        bail!("{} is not installed", gpg.program());
    }
    if let Ok(version) = gpg.version() {
        debug!(%version, "found gpg");
    }

    let key = gpg
        .export_private_key(&args.key_id)
        .context("failed to export private key")?;
    info!(bytes = key.len(), "private key exported");
    let fingerprint = gpg
        .fingerprint(&args.key_id)
        .context("failed to get key fingerprint")?;

    println!("Encrypting private key. Enter a passphrase. You will need it to");
    println!("recover your key from the QR codes. Keep it secret, keep it safe!");
    let encrypted = gpg
        .encrypt_aes256(&key)
        .context("failed to encrypt private key")?;
    drop(key);

    let payload = pipeline::encode_payload(&encrypted);
    info!(encrypted = encrypted.len(), encoded = payload.len(), "encrypted private key");

    let encoder = QrEncoder::new(config.qr_size);
    let mut renderer = PdfRenderer::new(&layout_config, config.page_size.font_size());
    let request = BackupRequest {
        payload: &payload,
        fingerprint: &fingerprint,
        out_dir: &args.out_dir,
        config: &config,
    };
    let artifacts = pipeline::run_backup(request, &encoder, &mut renderer).with_context(|| {
        format!(
            "backup failed; anything already written to {} was left in place",
            args.out_dir.display()
        )
    })?;

    for path in artifacts.images.iter().chain(artifacts.text.iter()) {
        println!("Wrote {}", path.display());
    }
    println!(
        "Wrote {} ({} codes on {} pages)",
        artifacts.pdf.display(),
        artifacts.fragments,
        artifacts.pages
    );
    println!("Payload SHA-256: {}", artifacts.digest);
    Ok(())
}

fn restore(args: RestoreArgs) -> Result<()> {
    let fragments = pipeline::read_fragments(&args.fragments)?;
    let restored = match pipeline::restore(&fragments, args.digest.as_deref()) {
        Ok(restored) => restored,
        Err(err @ PipelineError::Integrity(_)) => {
            let used: Vec<String> = args
                .fragments
                .iter()
                .map(|path| path.display().to_string())
                .collect();
            bail!(
                "{err}\nfragments used, in order: {}\nre-scan the codes and check their order, then try again",
                used.join(", ")
            );
        }
        Err(err) => return Err(err.into()),
    };

    println!("Payload SHA-256: {}", restored.digest);
    match args.output {
        Some(path) => {
            pipeline::write_private(&path, &restored.encrypted)?;
            println!(
                "Wrote {} ({} bytes); decrypt it with `gpg --decrypt`",
                path.display(),
                restored.encrypted.len()
            );
        }
        None => println!("Pass --output to write the encrypted key"),
    }
    Ok(())
}
