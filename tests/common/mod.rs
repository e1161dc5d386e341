#![allow(dead_code)]

pub mod app {
    use textgate::server::{GatewayResponse, ParsedRequest, SESSION_COOKIE};
    use textgate::{build_in_memory, AppService, ServiceOptions};

    pub fn service() -> AppService {
        build_in_memory(ServiceOptions::default()).expect("templates compile")
    }

    /// Session id announced by a `Set-Cookie` value (`sid=<id>; ...`).
    pub fn cookie_sid(res: &GatewayResponse) -> Option<String> {
        let cookie = res.set_cookie.as_deref()?;
        let first = cookie.split(';').next()?;
        first
            .strip_prefix(&format!("{SESSION_COOKIE}="))
            .map(str::to_string)
    }

    /// A visitor: remembers the cookie it was given.
    pub struct Browser<'a> {
        pub service: &'a AppService,
        pub sid: Option<String>,
    }

    impl<'a> Browser<'a> {
        pub fn new(service: &'a AppService) -> Self {
            Self { service, sid: None }
        }

        pub fn get(&mut self, target: &str) -> GatewayResponse {
            let mut req = ParsedRequest::get(target);
            if let Some(sid) = &self.sid {
                req = req.with_cookie(SESSION_COOKIE, sid);
            }
            let res = self.service.handle(&req);
            if let Some(sid) = cookie_sid(&res) {
                self.sid = Some(sid);
            }
            res
        }
    }
}

pub mod http {
    use std::io::{Read, Write};
    use std::net::{SocketAddr, TcpStream};
    use std::time::Duration;

    pub fn send_request(addr: &SocketAddr, req: &str) -> String {
        let mut stream = TcpStream::connect(addr).unwrap();
        stream.write_all(req.as_bytes()).unwrap();
        stream
            .set_read_timeout(Some(Duration::from_millis(200)))
            .unwrap();
        let mut buf = Vec::new();
        loop {
            let mut tmp = [0u8; 1024];
            match stream.read(&mut tmp) {
                Ok(0) => break,
                Ok(n) => buf.extend_from_slice(&tmp[..n]),
                Err(ref e)
                    if e.kind() == std::io::ErrorKind::WouldBlock
                        || e.kind() == std::io::ErrorKind::TimedOut =>
                {
                    break
                }
                Err(e) => panic!("read error: {:?}", e),
            }
        }
        String::from_utf8_lossy(&buf).to_string()
    }

    /// Status, lowercase-named headers and body of a raw response.
    pub fn parse_response(resp: &str) -> (u16, Vec<(String, String)>, String) {
        let (head, body) = resp.split_once("\r\n\r\n").unwrap_or((resp, ""));
        let mut lines = head.lines();
        let status = lines
            .next()
            .and_then(|l| l.split_whitespace().nth(1))
            .and_then(|s| s.parse().ok())
            .unwrap_or(0);
        let headers = lines
            .filter_map(|l| l.split_once(':'))
            .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
            .collect();
        (status, headers, body.to_string())
    }

    pub fn header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
        headers
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

pub mod test_server {
    use std::sync::Once;

    /// Ensures May coroutines are configured only once
    static MAY_INIT: Once = Once::new();

    pub fn setup_may_runtime() {
        MAY_INIT.call_once(|| {
            may::config().set_stack_size(0x8000);
        });
    }
}
