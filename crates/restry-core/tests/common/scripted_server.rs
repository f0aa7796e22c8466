//! Minimal HTTP/1.1 server that answers each request from a fixed script.
//!
//! Request N gets script entry N; once the script runs out the last entry is
//! repeated. Every request is counted and its method recorded so tests can
//! assert how many attempts reached the server.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub enum Reply {
    /// Respond with this status line and body.
    Status {
        code: u16,
        reason: &'static str,
        body: &'static str,
    },
    /// Wait before answering 200, so a client timeout fires first.
    Hang(Duration),
}

impl Reply {
    pub fn ok(body: &'static str) -> Self {
        Reply::Status {
            code: 200,
            reason: "OK",
            body,
        }
    }

    pub fn status(code: u16, reason: &'static str) -> Self {
        Reply::Status {
            code,
            reason,
            body: "",
        }
    }
}

pub struct ScriptedServer {
    pub url: String,
    hits: Arc<AtomicUsize>,
    methods: Arc<Mutex<Vec<String>>>,
}

impl ScriptedServer {
    /// Number of requests received so far.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// Request methods in arrival order.
    pub fn methods(&self) -> Vec<String> {
        self.methods.lock().unwrap().clone()
    }
}

/// Starts a server in a background thread. The server runs until the process exits.
pub fn start(script: Vec<Reply>) -> ScriptedServer {
    assert!(!script.is_empty(), "script needs at least one reply");
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let script = Arc::new(script);
    let hits = Arc::new(AtomicUsize::new(0));
    let methods = Arc::new(Mutex::new(Vec::new()));
    {
        let hits = Arc::clone(&hits);
        let methods = Arc::clone(&methods);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let script = Arc::clone(&script);
                let hits = Arc::clone(&hits);
                let methods = Arc::clone(&methods);
                thread::spawn(move || handle(stream, &script, &hits, &methods));
            }
        });
    }
    ScriptedServer {
        url: format!("http://127.0.0.1:{}/api/v1/resource", port),
        hits,
        methods,
    }
}

/// A URL on which nothing is listening (connection refused).
pub fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/api/v1/resource", port)
}

fn handle(
    mut stream: TcpStream,
    script: &[Reply],
    hits: &AtomicUsize,
    methods: &Mutex<Vec<String>>,
) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let method = std::str::from_utf8(&buf[..n])
        .ok()
        .and_then(|s| s.split_whitespace().next())
        .unwrap_or("")
        .to_string();
    let index = hits.fetch_add(1, Ordering::SeqCst);
    methods.lock().unwrap().push(method);

    let reply = script.get(index).unwrap_or(&script[script.len() - 1]);
    let (code, reason, body) = match reply {
        Reply::Status { code, reason, body } => (*code, *reason, *body),
        Reply::Hang(d) => {
            thread::sleep(*d);
            (200, "OK", "late")
        }
    };
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        code,
        reason,
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
}
