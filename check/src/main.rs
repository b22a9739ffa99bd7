//!
//! Nagios-compatible plugin checking the ink levels of an HP LEDM printer
//!
use std::time::Duration;

use clap::{ArgAction, Parser};
use log::{error, LevelFilter};

use inkmon::prelude::*;

fn new_client(uri: Uri, params: &CheckParams) -> Result<StatusClient, InkError> {
    let mut builder = StatusClient::builder(uri)
        .ignore_tls_errors(params.ignore_tls_errors)
        .request_timeout(Duration::from_secs(params.timeout));

    #[cfg(feature = "native-tls")]
    if params.native_tls {
        builder = builder.tls_backend(TlsBackend::Native);
    }

    for param in &params.headers {
        let (k, v) = param
            .split_once('=')
            .ok_or_else(|| InkError::InvalidHeader(param.clone()))?;
        builder = builder.http_header(k, v);
    }

    Ok(builder.build())
}

fn do_check(params: &CheckParams) -> Result<Verdict, InkError> {
    let checks = FillLevelCheck::from_groups(&params.fill_levels)?;
    let uri = util::endpoint_uri(&params.hostname, params.ssl, &params.path)?;
    let client = new_client(uri, params)?;

    util::check_printer(&client, &Evaluator::new(checks))
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new().filter_level(level).parse_default_env().init();
}

#[derive(Parser)]
#[clap(
    about = "Check ink levels of an HP LEDM printer",
    name = "check_ink_level",
    version,
    rename_all = "kebab-case"
)]
struct CheckParams {
    #[clap(long = "hostname", short = 'H', help = "Fully qualified name or IP address of the printer")]
    hostname: String,

    #[clap(
        long = "fill-level",
        short = 'f',
        required = true,
        num_args = 3,
        value_names = ["COLOR", "WARNING", "CRITICAL"],
        help = "Color fill level to check: color name, warning and critical percentage. Can be repeated"
    )]
    fill_levels: Vec<String>,

    #[clap(long = "ssl", short = 'S', help = "Use HTTPS to query the printer")]
    ssl: bool,

    #[clap(long = "ignore-tls-errors", short = 'i', help = "Ignore TLS handshake errors")]
    ignore_tls_errors: bool,

    #[cfg(feature = "native-tls")]
    #[clap(long = "native-tls", help = "Use the platform TLS implementation")]
    native_tls: bool,

    #[clap(long = "timeout", short = 't', default_value_t = 10, help = "Request timeout in seconds")]
    timeout: u64,

    #[clap(long = "path", default_value = util::PRODUCT_USAGE_PATH, help = "Path of the status document")]
    path: String,

    #[clap(long = "header", help = "Extra HTTP headers in key=value format")]
    headers: Vec<String>,

    #[clap(
        long = "verbose",
        short = 'v',
        action = ArgAction::Count,
        help = "Log more details to stderr, repeat for more"
    )]
    verbose: u8,
}

fn main() {
    let params = match CheckParams::try_parse() {
        Ok(params) => params,
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            eprint!("{e}");
            println!("{}: Invalid arguments", Status::Unknown);
            Status::Unknown.exit();
        }
    };

    init_logger(params.verbose);

    let report = match do_check(&params) {
        Ok(verdict) => Report::from_verdict(&verdict),
        Err(e) => {
            error!("Check failed: {e}");
            Report::from_error(&e)
        }
    };

    println!("{report}");
    report.status().exit();
}
