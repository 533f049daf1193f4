//! multireq — fire a batch of HTTP requests and print a report
//!
//! Usage:
//!   multireq [OPTIONS] <URL>...
//!
//! Options are layered over the `MULTIREQ_*` environment defaults.

use anyhow::{bail, Context};
use multireq::{GroupingPolicy, PoolConfig, Request, RequestPool};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

struct Args {
    config: PoolConfig,
    method: String,
    headers: Vec<(String, String)>,
    json: bool,
    urls: Vec<String>,
}

fn print_usage() {
    println!(
        r#"multireq — concurrent batch HTTP requests

USAGE:
    multireq [OPTIONS] <URL>...

OPTIONS:
    -X, --method <METHOD>     HTTP method for every request (default: GET)
    -H, --header <K:V>        Header sent with every request (repeatable)
    -l, --limit <N>           Requests running at once (default: 10)
    -t, --timeout <SECS>      Per-request timeout in seconds (default: 5)
        --legacy              Use legacy group planning
        --json                Print a JSON report
    -h, --help                Show this help message

ENVIRONMENT:
    MULTIREQ_GROUP_LIMIT, MULTIREQ_TIMEOUT_SECS, MULTIREQ_GROUPING,
    MULTIREQ_PROXY_URL, RUST_LOG"#
    );
}

fn parse_args(raw: &[String]) -> anyhow::Result<Option<Args>> {
    let mut args = Args {
        config: PoolConfig::from_env()?,
        method: "GET".to_string(),
        headers: Vec::new(),
        json: false,
        urls: Vec::new(),
    };

    let mut it = raw.iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(None),
            "-X" | "--method" => {
                args.method = it.next().context("--method needs a value")?.clone();
            }
            "-H" | "--header" => {
                let h = it.next().context("--header needs a value")?;
                let (k, v) = h
                    .split_once(':')
                    .with_context(|| format!("header '{}' is not in K:V form", h))?;
                args.headers.push((k.trim().to_string(), v.trim().to_string()));
            }
            "-l" | "--limit" => {
                let v = it.next().context("--limit needs a value")?;
                args.config.group_limit = v
                    .parse()
                    .with_context(|| format!("invalid limit '{}'", v))?;
            }
            "-t" | "--timeout" => {
                let v = it.next().context("--timeout needs a value")?;
                let secs: f64 = v.parse().with_context(|| format!("invalid timeout '{}'", v))?;
                args.config.timeout = match Duration::try_from_secs_f64(secs) {
                    Ok(d) if !d.is_zero() => d,
                    _ => bail!("timeout must be a positive number of seconds, got '{}'", v),
                };
            }
            "--legacy" => args.config.grouping = GroupingPolicy::Legacy,
            "--json" => args.json = true,
            other if other.starts_with('-') => bail!("unknown option: {}", other),
            url => args.urls.push(url.to_string()),
        }
    }

    if args.urls.is_empty() {
        bail!("no URLs given");
    }
    Ok(Some(args))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let raw: Vec<String> = std::env::args().skip(1).collect();
    let args = match parse_args(&raw)? {
        Some(a) => a,
        None => {
            print_usage();
            return Ok(());
        }
    };

    let requests: Vec<Request> = args
        .urls
        .iter()
        .map(|url| {
            args.headers
                .iter()
                .fold(Request::new(args.method.clone(), url.clone()), |req, (k, v)| {
                    req.with_header(k.clone(), v.clone())
                })
        })
        .collect();

    let mut pool = RequestPool::with_config(requests, args.config);
    let results = pool.run_blocking()?;

    if args.json {
        let report = serde_json::json!({
            "elapsed": results.elapsed(),
            "elapsed_ms": results.elapsed().millis(),
            "responses": results
                .iter()
                .map(|(req, resp)| serde_json::json!({
                    "request": req,
                    "response": resp.summary(),
                }))
                .collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for (req, resp) in &results {
            match &resp.error {
                Some(err) => println!("{} -> {} ({})", req, resp, err),
                None => println!("{} -> {}", req, resp),
            }
        }
        println!(
            "{}: {} succeeded, {} failed in {}",
            results,
            results.successful().len(),
            results.failed().len(),
            results.elapsed()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_timeout_option() {
        let args = parse_args(&argv(&["-t", "0.5", "http://a.test/"]))
            .unwrap()
            .unwrap();
        assert_eq!(args.config.timeout, Duration::from_millis(500));

        for bad in ["1e30", "-2", "0", "inf"] {
            assert!(
                parse_args(&argv(&["-t", bad, "http://a.test/"])).is_err(),
                "{bad}"
            );
        }
    }

    #[test]
    fn test_headers_limit_and_urls() {
        let args = parse_args(&argv(&[
            "-X",
            "post",
            "-H",
            "x-a: 1",
            "--limit",
            "4",
            "--legacy",
            "http://a.test/",
            "http://b.test/",
        ]))
        .unwrap()
        .unwrap();
        assert_eq!(args.method, "post");
        assert_eq!(args.headers, vec![("x-a".to_string(), "1".to_string())]);
        assert_eq!(args.config.group_limit, 4);
        assert_eq!(args.config.grouping, GroupingPolicy::Legacy);
        assert_eq!(args.urls.len(), 2);
    }

    #[test]
    fn test_rejects_missing_urls_and_unknown_options() {
        assert!(parse_args(&argv(&[])).is_err());
        assert!(parse_args(&argv(&["--frobnicate", "http://a.test/"])).is_err());
        assert!(parse_args(&argv(&["--help"])).unwrap().is_none());
    }
}
