//! PixelShield 命令行入口
//!
//! 用法：
//!   pixelshield encrypt --input <image> [--output <file>] [--key <password>]
//!   pixelshield decrypt --input <file> [--output <image>] [--key <password>]
//!   pixelshield formats
//!
//! 设计原则：
//! - 所有实际逻辑都委托给库
//! - 密码强度提示只在这里做，库不拒绝任何密码
//! - 错误只输出类型化错误的 Display，不暴露底层密码学细节

use std::path::{Path, PathBuf};
use std::process::exit;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// 低于该长度时给出弱密码提示
const PASSWORD_HINT_LEN: usize = 8;

#[derive(Debug, Parser)]
#[command(name = "pixelshield", version, about = "Secure image encryption tool")]
struct Cli {
    /// 提高日志级别（-v: info，-vv: debug），RUST_LOG 优先
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Encrypt an image file using AES-256-GCM
    Encrypt(FileArgs),
    /// Decrypt a previously encrypted image file
    Decrypt(FileArgs),
    /// List all supported image formats
    Formats,
}

#[derive(Debug, Args)]
struct FileArgs {
    /// Path to the input file
    #[arg(short, long)]
    input: PathBuf,

    /// Path to write the output file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Password (prompted for when omitted)
    #[arg(short, long)]
    key: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Encrypt,
    Decrypt,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// 未指定输出路径时的默认值：加密为 `.bin`，解密为 `.jpg`
fn default_output_path(input: &Path, mode: Mode) -> PathBuf {
    match mode {
        Mode::Encrypt => input.with_extension("bin"),
        Mode::Decrypt => input.with_extension("jpg"),
    }
}

fn read_password(mode: Mode) -> anyhow::Result<String> {
    let password = rpassword::prompt_password("Password: ").context("failed to read password")?;

    if mode == Mode::Encrypt {
        let confirm =
            rpassword::prompt_password("Confirm password: ").context("failed to read password")?;
        if confirm != password {
            bail!("passwords do not match");
        }
    }

    Ok(password)
}

fn run_file_command(args: FileArgs, mode: Mode) -> anyhow::Result<()> {
    let output = args
        .output
        .unwrap_or_else(|| default_output_path(&args.input, mode));

    let password = match args.key {
        Some(key) => key,
        None => read_password(mode)?,
    };

    if mode == Mode::Encrypt && password.chars().count() < PASSWORD_HINT_LEN {
        warn!("password is shorter than {PASSWORD_HINT_LEN} characters");
    }

    match mode {
        Mode::Encrypt => {
            pixelshield::encrypt_image(&args.input, &output, &password)?;
            println!("Image encrypted successfully: {}", output.display());
        }
        Mode::Decrypt => {
            pixelshield::decrypt_image(&args.input, &output, &password)?;
            println!("Image decrypted successfully: {}", output.display());
        }
    }

    Ok(())
}

fn print_formats() {
    println!("Supported Image Formats:");
    for (name, exts) in pixelshield::SUPPORTED_FORMATS {
        let exts: Vec<String> = exts.iter().map(|e| format!(".{e}")).collect();
        println!("  {name}: {}", exts.join(", "));
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Command::Encrypt(args) => run_file_command(args, Mode::Encrypt),
        Command::Decrypt(args) => run_file_command(args, Mode::Decrypt),
        Command::Formats => {
            print_formats();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        exit(1);
    }
}
