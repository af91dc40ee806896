#[macro_use]
extern crate log;

use std::{path::PathBuf, time::Duration};

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use otp56::{secret, totp, Algorithm, Code, Digits, Otp, Period, Secret};
use tokio::sync::mpsc;

#[derive(Debug, Subcommand)]
enum Commands {
  /// Counter based codes (RFC 4226)
  Hotp {
    #[arg(long, env = "OTP_SECRET", hide_env_values = true)]
    secret: Secret,
    #[arg(long, default_value_t = 0)]
    counter: u64,
    #[arg(long, help = "print a table of this many consecutive counters")]
    count: Option<u64>,
    #[arg(long, default_value_t = otp56::DEFAULT_DIGITS)]
    digits: u32,
    #[arg(long, default_value_t = Algorithm::Sha1)]
    algorithm: Algorithm,
    #[arg(long)]
    json: bool,
  },
  /// Time based codes (RFC 6238)
  Totp {
    #[arg(long, env = "OTP_SECRET", hide_env_values = true)]
    secret: Secret,
    #[arg(long, help = "unix time in seconds, defaults to now")]
    time: Option<u64>,
    #[arg(long, default_value_t = otp56::DEFAULT_PERIOD)]
    period: u64,
    #[arg(long, default_value_t = otp56::DEFAULT_DIGITS)]
    digits: u32,
    #[arg(long, default_value_t = Algorithm::Sha1)]
    algorithm: Algorithm,
    #[arg(long)]
    json: bool,
  },
  /// Keep printing the current TOTP code until interrupted
  Watch {
    #[arg(long, env = "OTP_SECRET", hide_env_values = true)]
    secret: Secret,
    #[arg(long, default_value_t = otp56::DEFAULT_PERIOD)]
    period: u64,
    #[arg(long, default_value_t = otp56::DEFAULT_DIGITS)]
    digits: u32,
    #[arg(long, default_value_t = Algorithm::Sha1)]
    algorithm: Algorithm,
    #[arg(long, help = "stop after this many refreshes")]
    count: Option<u64>,
  },
  /// Code for an account described by a json file (secret, type, digits, algorithm, period/counter)
  Show {
    file: PathBuf,
    #[arg(long, help = "unix time in seconds, defaults to now")]
    time: Option<u64>,
  },
  /// Generate a new random base32 secret
  Secret {
    #[arg(long, default_value_t = secret::DEFAULT_LENGTH)]
    length: usize,
  },
}

#[derive(Debug, Parser)]
struct Cli {
  #[arg(long, default_value = "info", help = "log spec, overridden by RUST_LOG")]
  log: String,
  #[command(subcommand)]
  command: Commands,
}

#[derive(Debug, serde::Serialize, tabled::Tabled)]
struct HotpRow {
  counter: u64,
  code: String,
}

fn hotp_rows(mut otp: Otp, count: u64) -> Vec<HotpRow> {
  let mut rows = Vec::new();
  for _ in 0..count {
    let counter = match otp.kind {
      otp56::OtpKind::Hotp { counter } => counter,
      otp56::OtpKind::Totp { .. } => break,
    };
    rows.push(HotpRow { counter, code: otp.code(None).otp });
    if counter == u64::MAX {
      break;
    }
    otp.advance();
  }
  rows
}

fn print_code(code: &Code, json: bool) -> Result<()> {
  if json {
    println!("{}", serde_json::to_string(code)?);
  } else {
    match code.remaining {
      Some(remaining) => println!("{} ({}s)", code.otp, remaining),
      None => println!("{}", code.otp),
    }
  }
  Ok(())
}

#[must_use]
struct AbortHandle(tokio::task::AbortHandle);

impl Drop for AbortHandle {
  fn drop(&mut self) {
    self.0.abort();
  }
}

/// Recomputes the code every `every` and sends it out. The task stops when
/// the returned handle is dropped or the receiver goes away.
fn spawn_refresh(otp: Otp, every: Duration, tx: mpsc::Sender<Code>) -> AbortHandle {
  let task = tokio::spawn(async move {
    let mut interval = tokio::time::interval(every);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    loop {
      interval.tick().await;
      if tx.send(otp.code(None)).await.is_err() {
        debug!("refresh receiver closed");
        break;
      }
    }
  });
  AbortHandle(task.abort_handle())
}

async fn watch(otp: Otp, count: Option<u64>) -> Result<()> {
  let (tx, mut rx) = mpsc::channel(1);
  let _refresh = spawn_refresh(otp, Duration::from_secs(1), tx);
  let mut shown = 0;
  loop {
    tokio::select! {
      code = rx.recv() => {
        let Some(code) = code else { break };
        print_code(&code, false)?;
        shown += 1;
        if count.is_some_and(|count| shown >= count) {
          break;
        }
      }
      result = tokio::signal::ctrl_c() => {
        result.context("listening for ctrl-c")?;
        info!("interrupted");
        break;
      }
    }
  }
  Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
  dotenvy::dotenv().ok();
  let args = Cli::parse();
  flexi_logger::Logger::try_with_env_or_str(&args.log)?.start().ok();
  debug!("{:?}", args);
  match args.command {
    Commands::Hotp { secret, counter, count, digits, algorithm, json } => {
      let otp = Otp::hotp(secret, counter).with_digits(Digits::new(digits)?).with_algorithm(algorithm);
      match count {
        Some(count) => {
          let rows = hotp_rows(otp, count);
          if json {
            println!("{}", serde_json::to_string(&rows)?);
          } else {
            println!("{}", tabled::Table::new(&rows));
          }
        }
        None => print_code(&otp.code(None), json)?,
      }
    }
    Commands::Totp { secret, time, period, digits, algorithm, json } => {
      let otp = Otp::totp(secret, Period::new(period)?).with_digits(Digits::new(digits)?).with_algorithm(algorithm);
      print_code(&otp.code(time), json)?;
    }
    Commands::Watch { secret, period, digits, algorithm, count } => {
      let period = Period::new(period)?;
      let otp = Otp::totp(secret, period).with_digits(Digits::new(digits)?).with_algorithm(algorithm);
      info!("refreshing every second, window {} ({}s left)", period, totp::remaining_at(totp::now(), period));
      watch(otp, count).await?;
    }
    Commands::Show { file, time } => {
      let text = std::fs::read_to_string(&file).with_context(|| format!("reading {}", file.display()))?;
      let otp: Otp = serde_json::from_str(&text).with_context(|| format!("parsing {}", file.display()))?;
      print_code(&otp.code(time), false)?;
    }
    Commands::Secret { length } => {
      if length == 0 {
        anyhow::bail!("length must be positive");
      }
      println!("{}", secret::generate(length));
    }
  }
  Ok(())
}

#[cfg(test)]
mod test {
  use super::*;

  fn rfc_secret() -> Secret {
    "GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ".parse().unwrap()
  }

  #[test]
  fn test_cli_parse() {
    let cli = Cli::try_parse_from(["otp", "hotp", "--secret", "NBSWY3DP", "--algorithm", "sha256", "--count", "3"]).unwrap();
    match cli.command {
      Commands::Hotp { secret, counter, count, digits, algorithm, json } => {
        assert_eq!(secret.as_bytes(), b"hello");
        assert_eq!((counter, count, digits, algorithm, json), (0, Some(3), 6, Algorithm::Sha256, false));
      }
      other => panic!("unexpected {:?}", other),
    }
    assert!(Cli::try_parse_from(["otp", "totp", "--secret", "NBSWY3DP", "--algorithm", "MD5"]).is_err());
    assert!(Cli::try_parse_from(["otp", "totp", "--secret", "GEZD1NBV"]).is_err());
  }

  #[test]
  fn test_hotp_rows() {
    let rows = hotp_rows(Otp::hotp(rfc_secret(), 0), 3);
    let codes = rows.iter().map(|row| (row.counter, row.code.as_str())).collect::<Vec<_>>();
    assert_eq!(codes, [(0, "755224"), (1, "287082"), (2, "359152")]);
    assert_eq!(hotp_rows(Otp::hotp(rfc_secret(), u64::MAX), 3).len(), 1);
    assert!(hotp_rows(Otp::totp(rfc_secret(), Period::default()), 3).is_empty());
  }

  #[tokio::test]
  async fn test_refresh() {
    let (tx, mut rx) = mpsc::channel(1);
    let handle = spawn_refresh(Otp::totp(rfc_secret(), Period::default()), Duration::from_millis(10), tx);
    for _ in 0..3 {
      let code = rx.recv().await.unwrap();
      assert_eq!(code.otp.len(), 6);
      assert!((1..=30).contains(&code.remaining.unwrap()));
    }
    drop(handle);
    // aborting drops the sender, whatever was buffered drains first
    while rx.recv().await.is_some() {}
  }
}
