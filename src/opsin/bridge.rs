use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Mutex;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::PipelineError;
use crate::opsin::NameParser;

pub const OPSIN_JAR_NAME: &str = "opsin-cli-2.8.0-jar-with-dependencies.jar";
pub const OPSIN_JAR_URL: &str =
    "https://github.com/dan2097/opsin/releases/download/2.8.0/opsin-cli-2.8.0-jar-with-dependencies.jar";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// How to launch the OPSIN command line tool. It must read one name per
/// line on stdin and answer with one SMILES line per name, empty when the
/// name could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpsinConfig {
    pub program: String,
    pub args: Vec<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl OpsinConfig {
    pub fn for_jar(jar: &Path) -> Self {
        Self {
            program: "java".to_string(),
            args: vec![
                "-Xmx4096M".to_string(),
                "-jar".to_string(),
                jar.display().to_string(),
                "-osmi".to_string(),
            ],
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

struct OpsinProcess {
    child: Child,
    stdin: ChildStdin,
    lines: Receiver<std::io::Result<String>>,
}

impl OpsinProcess {
    fn spawn(config: &OpsinConfig) -> Result<Self, PipelineError> {
        log::info!("starting OPSIN: {} {}", config.program, config.args.join(" "));

        let mut child = Command::new(&config.program)
            .args(&config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                PipelineError::ExternalService(format!(
                    "could not start {}: {e}",
                    config.program
                ))
            })?;

        let stdin = child.stdin.take();
        let stdout = child.stdout.take();
        let (stdin, stdout) = match (stdin, stdout) {
            (Some(stdin), Some(stdout)) => (stdin, stdout),
            _ => {
                let _ = child.kill();
                return Err(PipelineError::ExternalService(
                    "OPSIN process has no stdio pipes".to_string(),
                ));
            }
        };

        let (sender, lines) = mpsc::channel();
        std::thread::Builder::new()
            .name("opsin-reader".to_string())
            .spawn(move || {
                for line in BufReader::new(stdout).lines() {
                    if sender.send(line).is_err() {
                        break;
                    }
                }
            })?;

        Ok(Self {
            child,
            stdin,
            lines,
        })
    }

    fn kill(mut self) {
        if let Err(e) = self.child.kill() {
            log::warn!("could not kill OPSIN process: {e}");
        }
        let _ = self.child.wait();
    }
}

/// Lazily started, long lived OPSIN child process.
///
/// At most one process is started at a time; requests are answered one at a
/// time under the mutex. A request that is not answered within the timeout
/// kills the process and the next request starts a fresh one.
pub struct OpsinBridge {
    config: OpsinConfig,
    process: Mutex<Option<OpsinProcess>>,
}

impl OpsinBridge {
    pub fn new(config: OpsinConfig) -> Self {
        Self {
            config,
            process: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &OpsinConfig {
        &self.config
    }

    fn ask(process: &mut OpsinProcess, name: &str, timeout: Duration) -> Result<String, String> {
        writeln!(process.stdin, "{name}")
            .and_then(|_| process.stdin.flush())
            .map_err(|e| format!("could not write to OPSIN: {e}"))?;

        match process.lines.recv_timeout(timeout) {
            Ok(Ok(line)) => Ok(line),
            Ok(Err(e)) => Err(format!("could not read from OPSIN: {e}")),
            Err(RecvTimeoutError::Timeout) => Err(format!(
                "OPSIN did not answer within {}s",
                timeout.as_secs_f32()
            )),
            Err(RecvTimeoutError::Disconnected) => Err("OPSIN process exited".to_string()),
        }
    }
}

impl NameParser for OpsinBridge {
    fn parse(&self, name: &str) -> Result<String, PipelineError> {
        if name.contains(['\n', '\r']) {
            return Err(PipelineError::Parse {
                name: name.to_string(),
                message: "names must be a single line".to_string(),
            });
        }
        if name.trim().is_empty() {
            return Err(PipelineError::Parse {
                name: name.to_string(),
                message: "empty name".to_string(),
            });
        }

        let mut slot = self
            .process
            .lock()
            .map_err(|_| PipelineError::ExternalService("OPSIN lock poisoned".to_string()))?;

        if slot.is_none() {
            *slot = Some(OpsinProcess::spawn(&self.config)?);
        }

        let answer = match slot.as_mut() {
            Some(process) => Self::ask(process, name.trim(), self.config.timeout()),
            None => Err("OPSIN process missing".to_string()),
        };

        match answer {
            Ok(line) => {
                let smiles = line.trim();
                if smiles.is_empty() {
                    Err(PipelineError::Parse {
                        name: name.to_string(),
                        message: "OPSIN could not interpret the name".to_string(),
                    })
                } else {
                    Ok(smiles.to_string())
                }
            }
            Err(message) => {
                log::warn!("{message}, restarting OPSIN on next request");
                if let Some(process) = slot.take() {
                    process.kill();
                }
                Err(PipelineError::ExternalService(message))
            }
        }
    }
}

impl Drop for OpsinBridge {
    fn drop(&mut self) {
        if let Ok(mut slot) = self.process.lock() {
            if let Some(process) = slot.take() {
                process.kill();
            }
        }
    }
}
