//! `visit` command: drive an HTTP browser to a page through a navigation.

use std::sync::Arc;
use std::time::Duration;

use clap::{Arg, ArgAction, ArgMatches, Command};
use serde::Serialize;

use crate::cli::{wants_json, CommandBuilder, CommandCategory, CommandMeta};
use crate::driver::{DriverHandle, HttpDriver};
use crate::errors::{NavError, Result};
use crate::output;
use crate::page::PageKwargs;
use crate::session::Session;

pub fn visit_command() -> Command {
    Command::new("visit")
        .about("Open the skin home page, then visit a page id")
        .arg(
            Arg::new("page_id")
                .value_name("PAGE_ID")
                .required(true)
                .help("Page id declared in the page mappings"),
        )
        .arg(
            Arg::new("expect-text")
                .long("expect-text")
                .value_name("TEXT")
                .help("Fail unless TEXT shows up on the visited page"),
        )
        .arg(
            Arg::new("kwarg")
                .long("kwarg")
                .short('k')
                .value_name("KEY=VALUE")
                .action(ArgAction::Append)
                .help("Keyword passed to the page (base_url, timeout or page specific)"),
        )
}

pub fn visit_meta() -> CommandMeta {
    CommandBuilder::from_clap(visit_command())
        .category(CommandCategory::Browser)
        .build()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisitOutcome {
    pub page_id: String,
    pub url: String,
}

/// Kwargs from repeated `--kwarg KEY=VALUE` flags.
pub fn parse_kwargs(matches: &ArgMatches) -> Result<PageKwargs> {
    matches
        .get_many::<String>("kwarg")
        .into_iter()
        .flatten()
        .try_fold(PageKwargs::new(), |kwargs, pair| {
            kwargs.parse_pair(pair).map_err(NavError::Config)
        })
}

/// Start a navigation on `browser`, visit `page_id` and optionally check
/// that `expect_text` shows up within `wait_time`.
pub async fn visit(
    session: &Session,
    browser: DriverHandle,
    page_id: &str,
    kwargs: PageKwargs,
    expect_text: Option<&str>,
    wait_time: Duration,
) -> Result<VisitOutcome> {
    let mut navigation = session.navigation(browser).await?;
    let page = navigation.visit_page(page_id, kwargs).await?;
    let url = page.driver().current_url().await?;

    if let Some(text) = expect_text {
        if !page.driver().is_text_present(text, wait_time).await? {
            return Err(NavError::Navigation(format!(
                "text '{}' not found on {}",
                text, url
            )));
        }
    }

    Ok(VisitOutcome {
        page_id: page_id.to_string(),
        url,
    })
}

pub async fn handle_visit(
    matches: &ArgMatches,
    session: &Session,
    timeout: Duration,
) -> Result<()> {
    let page_id = matches
        .get_one::<String>("page_id")
        .map(String::as_str)
        .unwrap_or_default();
    let expect_text = matches.get_one::<String>("expect-text").map(String::as_str);
    let kwargs = parse_kwargs(matches)?;
    let wait_time = kwargs.timeout.unwrap_or(timeout);

    let browser: DriverHandle = Arc::new(HttpDriver::new(timeout)?);
    let outcome = visit(session, browser, page_id, kwargs, expect_text, wait_time).await?;

    if wants_json(matches) {
        return output::json(&outcome);
    }
    output::success(&format!("Visited {}", outcome.page_id));
    output::field("url", &outcome.url);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{sample_session, MockDriver};
    use std::net::SocketAddr;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve a page naming the requested path, for every path.
    async fn serve() -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                let mut buf = vec![0u8; 4096];
                let read = socket.read(&mut buf).await.unwrap_or(0);
                let request = String::from_utf8_lossy(&buf[..read]).to_string();
                let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();
                let body = format!("<html><body><h1>Page {}</h1></body></html>", path);
                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        addr
    }

    #[test]
    fn test_parse_kwargs() {
        let matches = visit_command()
            .try_get_matches_from(["visit", "HomePage", "-k", "timeout=2", "--kwarg", "lang=en"])
            .unwrap();
        let kwargs = parse_kwargs(&matches).unwrap();
        assert_eq!(kwargs.timeout, Some(Duration::from_secs(2)));
        assert_eq!(kwargs.get("lang"), Some(&serde_json::json!("en")));
    }

    #[test]
    fn test_parse_kwargs_rejects_bad_pair() {
        let matches = visit_command()
            .try_get_matches_from(["visit", "HomePage", "-k", "oops"])
            .unwrap();
        assert!(matches!(parse_kwargs(&matches), Err(NavError::Config(_))));
    }

    #[tokio::test]
    async fn test_visit_with_mock_driver() {
        let session = sample_session("https://skin1-coolsite.com");
        let driver = Arc::new(MockDriver::new().with_text("Welcome"));
        let outcome = visit(
            &session,
            driver.clone(),
            "AnotherPage",
            PageKwargs::new(),
            Some("Welcome"),
            Duration::ZERO,
        )
        .await
        .unwrap();
        assert_eq!(outcome.url, "https://skin1-coolsite.com/example");
        assert_eq!(driver.visits().len(), 2);
    }

    #[tokio::test]
    async fn test_visit_missing_text_fails() {
        let session = sample_session("https://skin1-coolsite.com");
        let driver = Arc::new(MockDriver::new());
        let result = visit(
            &session,
            driver,
            "HomePage",
            PageKwargs::new(),
            Some("Welcome"),
            Duration::ZERO,
        )
        .await;
        assert!(matches!(result, Err(NavError::Navigation(msg)) if msg.contains("Welcome")));
    }

    #[tokio::test]
    async fn test_visit_over_http() {
        let addr = serve().await;
        let session = sample_session(&format!("http://{}", addr));
        let browser: DriverHandle = Arc::new(HttpDriver::new(Duration::from_secs(5)).unwrap());

        let outcome = visit(
            &session,
            browser,
            "HomePage",
            PageKwargs::new(),
            Some("Page /home"),
            Duration::from_secs(1),
        )
        .await
        .unwrap();
        assert_eq!(outcome.url, format!("http://{}/home", addr));
    }
}
