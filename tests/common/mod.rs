#![allow(dead_code)]

pub mod test_server {
    use std::net::SocketAddr;
    use std::sync::Once;
    use typed_route::{AppService, HttpServer, ServerHandle};

    /// Ensures May coroutines are configured only once
    static MAY_INIT: Once = Once::new();

    pub fn setup_may_runtime() {
        MAY_INIT.call_once(|| {
            may::config().set_stack_size(0x8000);
        });
    }

    /// Server on an ephemeral port, stopped when dropped
    pub struct TestServer {
        handle: Option<ServerHandle>,
        addr: SocketAddr,
    }

    impl TestServer {
        pub fn start(service: AppService) -> Self {
            setup_may_runtime();
            let handle = HttpServer(service).start("127.0.0.1:0").unwrap();
            handle.wait_ready().unwrap();
            let addr = handle.addr();
            Self {
                handle: Some(handle),
                addr,
            }
        }

        pub fn addr(&self) -> SocketAddr {
            self.addr
        }
    }

    impl Drop for TestServer {
        fn drop(&mut self) {
            if let Some(handle) = self.handle.take() {
                handle.stop();
            }
        }
    }
}

pub mod http {
    use std::io::{Read, Write};
    use std::net::{SocketAddr, TcpStream};
    use std::time::{Duration, Instant};

    #[derive(Debug)]
    pub struct TestResponse {
        pub status: u16,
        pub headers: Vec<(String, String)>,
        pub body: String,
    }

    impl TestResponse {
        pub fn header(&self, name: &str) -> Option<&str> {
            self.headers
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.as_str())
        }

        pub fn json(&self) -> serde_json::Value {
            serde_json::from_str(&self.body).unwrap_or_default()
        }
    }

    /// Build a raw HTTP/1.1 request
    pub fn request(method: &str, path: &str, body: Option<(&str, &str)>) -> String {
        match body {
            Some((content_type, body)) => format!(
                "{method} {path} HTTP/1.1\r\nHost: localhost\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\n\r\n{body}",
                body.len()
            ),
            None => format!("{method} {path} HTTP/1.1\r\nHost: localhost\r\n\r\n"),
        }
    }

    /// Build a raw HTTP/1.1 request whose body is arbitrary bytes
    pub fn request_bytes(method: &str, path: &str, content_type: &str, body: &[u8]) -> Vec<u8> {
        let mut raw = format!(
            "{method} {path} HTTP/1.1\r\nHost: localhost\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\n\r\n",
            body.len()
        )
        .into_bytes();
        raw.extend_from_slice(body);
        raw
    }

    /// Send a raw request and read one response
    pub fn send_request(addr: &SocketAddr, req: &str) -> TestResponse {
        send_bytes(addr, req.as_bytes())
    }

    /// Send raw request bytes and read one response
    ///
    /// Reads until the headers and `Content-Length` bytes of body have
    /// arrived, or the read window closes.
    pub fn send_bytes(addr: &SocketAddr, req: &[u8]) -> TestResponse {
        let mut stream = TcpStream::connect(addr).unwrap();
        stream.write_all(req).unwrap();
        stream
            .set_read_timeout(Some(Duration::from_millis(200)))
            .unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        let mut buf = Vec::new();
        while Instant::now() < deadline {
            let mut tmp = [0u8; 4096];
            match stream.read(&mut tmp) {
                Ok(0) => break,
                Ok(n) => {
                    buf.extend_from_slice(&tmp[..n]);
                    if is_complete(&buf) {
                        break;
                    }
                }
                Err(ref e)
                    if e.kind() == std::io::ErrorKind::WouldBlock
                        || e.kind() == std::io::ErrorKind::TimedOut =>
                {
                    if is_complete(&buf) {
                        break;
                    }
                }
                Err(e) => panic!("read error: {e:?}"),
            }
        }
        parse_response(&String::from_utf8_lossy(&buf))
    }

    fn is_complete(buf: &[u8]) -> bool {
        let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
            return false;
        };
        let head = String::from_utf8_lossy(&buf[..pos]);
        let length = head
            .lines()
            .filter_map(|l| l.split_once(':'))
            .find(|(k, _)| k.trim().eq_ignore_ascii_case("content-length"))
            .and_then(|(_, v)| v.trim().parse::<usize>().ok())
            .unwrap_or(0);
        buf.len() >= pos + 4 + length
    }

    pub fn parse_response(resp: &str) -> TestResponse {
        let (head, body) = resp.split_once("\r\n\r\n").unwrap_or((resp, ""));
        let mut lines = head.lines();
        let status = lines
            .next()
            .and_then(|l| l.split_whitespace().nth(1))
            .and_then(|s| s.parse().ok())
            .unwrap_or(0);
        let headers = lines
            .filter_map(|l| l.split_once(':'))
            .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
            .collect();
        TestResponse {
            status,
            headers,
            body: body.to_string(),
        }
    }
}

pub mod users {
    use super::test_server::TestServer;
    use typed_route::{AppConfig, ResponseFormat};
    use users_app::{build_service, UserStore};

    /// Users app over a fresh seeded store
    pub fn start(format: ResponseFormat) -> TestServer {
        super::test_server::setup_may_runtime();
        let config = AppConfig {
            addr: "127.0.0.1:0".to_string(),
            format,
            templates_dir: Some(users_app::templates_dir()),
        };
        let store = UserStore::spawn().unwrap();
        TestServer::start(build_service(&config, &store).unwrap())
    }
}
