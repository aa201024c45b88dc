use anyhow::{Result, anyhow};
use std::net::SocketAddr;
use std::time::{Duration, Instant};
use tiny_http::{Response, Server};
use url::Url;

use crate::session::{self, Identity};

/// Browser entry point of the sign-in flow.
pub fn sign_in_url(base_url: &str) -> Result<Url> {
    let base = Url::parse(base_url).map_err(|e| anyhow!("invalid base_url '{base_url}': {e}"))?;
    Ok(base.join("auth/login")?)
}

/// Open the sign-in page and wait for the post-login redirect on `listen`.
pub fn sign_in(base_url: &str, listen: SocketAddr, timeout: Duration) -> Result<Identity> {
    // bind before opening the browser so the redirect can't beat us
    let server = Server::http(listen)
        .map_err(|e| anyhow!("Failed to bind sign-in redirect listener on {listen}: {e:?}"))?;

    let url = sign_in_url(base_url)?;
    println!("Open this URL in your browser to sign in:\n{url}");
    if let Err(e) = open::that(url.as_str()) {
        log::warn!("could not open browser automatically: {e}");
    }

    wait_for_identity(&server, listen, timeout)?
        .ok_or_else(|| anyhow!("No signed-in user received within {}s", timeout.as_secs()))
}

/// Serve redirect requests until one carries an identity or `timeout` passes.
pub fn wait_for_identity(
    server: &Server,
    listen: SocketAddr,
    timeout: Duration,
) -> Result<Option<Identity>> {
    let wait_until = Instant::now() + timeout;

    while Instant::now() < wait_until {
        let Some(request) = server.recv_timeout(Duration::from_millis(500))? else {
            continue;
        };

        // request.url() is path+query only
        let full = format!("http://{listen}{}", request.url());
        match session::resolve_str(&full) {
            Some(identity) => {
                let _ = request.respond(Response::from_string(
                    "Signed in. You can close this tab and return to the terminal.",
                ));
                return Ok(Some(identity));
            }
            None => {
                log::debug!("redirect without identity: {}", request.url());
                let _ = request.respond(
                    Response::from_string("No user found in redirect. You can close this tab.")
                        .with_status_code(400),
                );
            }
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpStream;

    #[test]
    fn sign_in_url_joins_login_path() {
        let u = sign_in_url("http://localhost:8000").unwrap();
        assert_eq!(u.as_str(), "http://localhost:8000/auth/login");
    }

    fn hit(addr: SocketAddr, path: &str) -> String {
        let mut s = TcpStream::connect(addr).unwrap();
        write!(s, "GET {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n").unwrap();
        let mut out = String::new();
        s.read_to_string(&mut out).unwrap();
        out
    }

    #[test]
    fn captures_identity_from_redirect() {
        let addr = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap();
        let server = Server::http(addr).unwrap();

        let client = std::thread::spawn(move || {
            let first = hit(addr, "/favicon.ico");
            let second = hit(addr, "/?user_id=jane%40example.com");
            (first, second)
        });

        let id = wait_for_identity(&server, addr, Duration::from_secs(10)).unwrap();
        let (first, second) = client.join().unwrap();

        assert_eq!(id.unwrap().as_str(), "jane@example.com");
        assert!(first.contains("400"));
        assert!(second.contains("Signed in"));
    }
}
