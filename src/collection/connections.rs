//! Enumeration of active transport-layer connections and their owning
//! processes.
//!
//! The collector only relies on the [`ConnectionEnumerator`] trait. The default
//! implementation shells out to the platform's socket listing tool and parses
//! its output; the parsers are plain functions so they are usable (and tested)
//! on every platform.

use std::{
    io::Read,
    process::{Command, Stdio},
    thread,
    time::{Duration, Instant},
};

use cfg_if::cfg_if;

use super::{
    error::{CollectionError, CollectionResult},
    processes::Pid,
};

/// How often a running enumerator command is polled for completion.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Tcp,
    Udp,
}

impl Protocol {
    fn from_label(label: &str) -> Option<Self> {
        if label.eq_ignore_ascii_case("tcp") || label.eq_ignore_ascii_case("tcp6") {
            Some(Protocol::Tcp)
        } else if label.eq_ignore_ascii_case("udp") || label.eq_ignore_ascii_case("udp6") {
            Some(Protocol::Udp)
        } else {
            None
        }
    }
}

/// One active connection and, if known, the process that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connection {
    pub protocol: Protocol,
    pub pid: Option<Pid>,
}

/// Lists active connections.
pub trait ConnectionEnumerator {
    /// Returns the currently active connections. Implementations must give up
    /// once `timeout` has elapsed.
    fn connections(&self, timeout: Duration) -> CollectionResult<Vec<Connection>>;
}

/// A [`ConnectionEnumerator`] that runs an external command and parses its
/// standard output.
#[derive(Debug, Clone)]
pub struct CommandEnumerator {
    program: &'static str,
    args: &'static [&'static str],
    parser: fn(&str) -> Vec<Connection>,
}

impl CommandEnumerator {
    pub fn new(
        program: &'static str, args: &'static [&'static str], parser: fn(&str) -> Vec<Connection>,
    ) -> Self {
        Self {
            program,
            args,
            parser,
        }
    }

    /// The enumerator for the current platform.
    pub fn platform_default() -> Self {
        platform_command()
    }
}

cfg_if! {
    if #[cfg(target_os = "windows")] {
        fn platform_command() -> CommandEnumerator {
            CommandEnumerator::new("netstat", &["-n", "-o"], parse_netstat)
        }
    } else if #[cfg(target_os = "linux")] {
        fn platform_command() -> CommandEnumerator {
            CommandEnumerator::new("ss", &["-t", "-u", "-n", "-p", "-H"], parse_ss)
        }
    } else {
        fn platform_command() -> CommandEnumerator {
            CommandEnumerator::new("lsof", &["-i", "-n", "-P", "-F", "pP"], parse_lsof)
        }
    }
}

impl ConnectionEnumerator for CommandEnumerator {
    fn connections(&self, timeout: Duration) -> CollectionResult<Vec<Connection>> {
        let output = run_command(self.program, self.args, timeout)?;
        Ok((self.parser)(&output))
    }
}

/// Runs `program` and returns its standard output, killing it if it has not
/// exited within `timeout`.
pub(crate) fn run_command(
    program: &str, args: &[&str], timeout: Duration,
) -> CollectionResult<String> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|source| CollectionError::Spawn {
            program: program.to_string(),
            source,
        })?;

    // Drain stdout on its own thread so a large listing can't fill the pipe and
    // stall the child.
    let reader = child.stdout.take().map(|mut stdout| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = stdout.read_to_end(&mut buf);
            buf
        })
    });
    let collect_output = |reader: Option<thread::JoinHandle<Vec<u8>>>| {
        reader
            .and_then(|handle| handle.join().ok())
            .map(|buf| String::from_utf8_lossy(&buf).into_owned())
            .unwrap_or_default()
    };

    let start = Instant::now();
    loop {
        match child.try_wait() {
            Ok(Some(status)) => {
                let output = collect_output(reader);
                return if status.success() {
                    Ok(output)
                } else {
                    Err(CollectionError::Failed {
                        program: program.to_string(),
                        status,
                    })
                };
            }
            Ok(None) => {
                if start.elapsed() >= timeout {
                    let _ = child.kill();
                    let _ = child.wait();
                    let _ = collect_output(reader);
                    return Err(CollectionError::Timeout {
                        program: program.to_string(),
                        timeout,
                    });
                }
                thread::sleep(POLL_INTERVAL);
            }
            Err(source) => {
                let _ = child.kill();
                return Err(CollectionError::Spawn {
                    program: program.to_string(),
                    source,
                });
            }
        }
    }
}

/// Parses `netstat -n -o` output (Windows). TCP rows end in a state and then
/// the PID; UDP rows have no state, so the PID is always the last column.
pub fn parse_netstat(output: &str) -> Vec<Connection> {
    output
        .lines()
        .filter_map(|line| {
            let parts: Vec<&str> = line.split_whitespace().collect();
            let protocol = Protocol::from_label(parts.first()?)?;
            if parts.len() < 4 {
                return None;
            }

            Some(Connection {
                protocol,
                pid: parts.last().and_then(|pid| pid.parse().ok()),
            })
        })
        .collect()
}

/// Parses `ss -tunpH` output (Linux). Every `pid=<n>` inside the `users:`
/// column is an owner of the socket.
pub fn parse_ss(output: &str) -> Vec<Connection> {
    let mut connections = Vec::new();

    for line in output.lines() {
        let Some(protocol) = line.split_whitespace().next().and_then(Protocol::from_label) else {
            continue;
        };

        let pids: Vec<Pid> = line
            .split("pid=")
            .skip(1)
            .filter_map(|rest| {
                let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
                digits.parse().ok()
            })
            .collect();

        if pids.is_empty() {
            connections.push(Connection {
                protocol,
                pid: None,
            });
        } else {
            connections.extend(pids.into_iter().map(|pid| Connection {
                protocol,
                pid: Some(pid),
            }));
        }
    }

    connections
}

/// Parses `lsof -i -n -P -F pP` output (macOS and other unixes). A `p` line
/// names the process that owns the `P` (protocol) lines following it.
pub fn parse_lsof(output: &str) -> Vec<Connection> {
    let mut connections = Vec::new();
    let mut current_pid = None;

    for line in output.lines() {
        if let Some(pid) = line.strip_prefix('p') {
            current_pid = pid.trim().parse().ok();
        } else if let Some(protocol) = line.strip_prefix('P').and_then(Protocol::from_label) {
            connections.push(Connection {
                protocol,
                pid: current_pid,
            });
        }
    }

    connections
}

#[cfg(test)]
mod test {
    use indoc::indoc;

    use super::*;

    #[test]
    fn netstat_output() {
        let output = indoc! {"
            Active Connections

              Proto  Local Address          Foreign Address        State           PID
              TCP    0.0.0.0:135            0.0.0.0:0              LISTENING       1052
              TCP    192.168.1.5:50912      142.250.72.14:443      ESTABLISHED     8812
              TCP    [::]:445               [::]:0                 LISTENING       4
              UDP    0.0.0.0:5353           *:*                                    2440
              UDP    [::1]:1900             *:*                                    bogus
        "};

        assert_eq!(
            parse_netstat(output),
            vec![
                Connection { protocol: Protocol::Tcp, pid: Some(1052) },
                Connection { protocol: Protocol::Tcp, pid: Some(8812) },
                Connection { protocol: Protocol::Tcp, pid: Some(4) },
                Connection { protocol: Protocol::Udp, pid: Some(2440) },
                Connection { protocol: Protocol::Udp, pid: None },
            ]
        );
    }

    #[test]
    fn ss_output() {
        let output = indoc! {r#"
            tcp   ESTAB  0      0      10.0.0.2:40222   140.82.112.26:443  users:(("firefox",pid=2211,fd=115))
            tcp   ESTAB  0      0      10.0.0.2:50100   1.1.1.1:853        users:(("systemd-resolve",pid=612,fd=23),("helper",pid=613,fd=4))
            udp   UNCONN 0      0      0.0.0.0:5353     0.0.0.0:*
            Netid State  Recv-Q Send-Q Local            Peer
        "#};

        assert_eq!(
            parse_ss(output),
            vec![
                Connection { protocol: Protocol::Tcp, pid: Some(2211) },
                Connection { protocol: Protocol::Tcp, pid: Some(612) },
                Connection { protocol: Protocol::Tcp, pid: Some(613) },
                Connection { protocol: Protocol::Udp, pid: None },
            ]
        );
    }

    #[test]
    fn lsof_output() {
        let output = indoc! {"
            p501
            f23
            PTCP
            f24
            PUDP
            p777
            f5
            PTCP
        "};

        assert_eq!(
            parse_lsof(output),
            vec![
                Connection { protocol: Protocol::Tcp, pid: Some(501) },
                Connection { protocol: Protocol::Udp, pid: Some(501) },
                Connection { protocol: Protocol::Tcp, pid: Some(777) },
            ]
        );
    }

    #[test]
    fn empty_output_has_no_connections() {
        assert!(parse_netstat("").is_empty());
        assert!(parse_ss("").is_empty());
        assert!(parse_lsof("").is_empty());
    }

    #[test]
    fn missing_program_is_an_error() {
        let result = run_command(
            "netledger-definitely-not-a-real-program",
            &[],
            Duration::from_secs(1),
        );
        assert!(matches!(result, Err(CollectionError::Spawn { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn slow_program_times_out() {
        let start = Instant::now();
        let result = run_command("sleep", &["5"], Duration::from_millis(100));

        assert!(matches!(result, Err(CollectionError::Timeout { .. })));
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[cfg(unix)]
    #[test]
    fn failing_program_is_an_error() {
        let result = run_command("false", &[], Duration::from_secs(5));
        assert!(matches!(result, Err(CollectionError::Failed { .. })));
    }
}
