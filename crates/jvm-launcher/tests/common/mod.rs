//! A scripted spawner for exercising the launchers without real JVMs.

use std::ffi::OsString;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_channel::{bounded, Receiver, Sender};
use async_trait::async_trait;
use futures::stream;
use jvm_launcher::bootstrap::BootstrapProperties;
use jvm_launcher::submit::LaunchEnvironment;
use jvm_launcher::GalasaHome;
use process_executor::{
    Command, EventStream, ExitStatus, ProcessEvent, ProcessEventType, ProcessHandle, Spawner,
};

/// One recorded spawn: the program and its arguments.
#[derive(Debug, Clone)]
pub struct SpawnRecord {
    pub program: String,
    pub args: Vec<String>,
}

/// A spawner which plays back scripted output instead of starting a
/// real process. The handle only reports exit once the test opens the
/// exit gate, so completion timing is fully controlled.
pub struct MockSpawner {
    output_lines: Vec<String>,
    exit_code: i32,
    gate_rx: Receiver<()>,
    spawned: Arc<Mutex<Vec<SpawnRecord>>>,
}

/// Opens the exit gate of a [`MockSpawner`]'s processes.
pub struct ExitGate {
    gate_tx: Sender<()>,
}

impl ExitGate {
    /// Let all processes spawned by the paired spawner exit.
    pub fn open(&self) {
        self.gate_tx.close();
    }
}

impl MockSpawner {
    /// A spawner whose processes emit the given stdout lines, then wait
    /// for the returned gate before exiting with the given code.
    pub fn gated(output_lines: Vec<String>, exit_code: i32) -> (Self, ExitGate) {
        let (gate_tx, gate_rx) = bounded::<()>(1);
        let spawner = Self {
            output_lines,
            exit_code,
            gate_rx,
            spawned: Arc::new(Mutex::new(Vec::new())),
        };
        (spawner, ExitGate { gate_tx })
    }

    /// A spawner whose processes exit immediately.
    pub fn immediate(output_lines: Vec<String>, exit_code: i32) -> Self {
        let (spawner, gate) = Self::gated(output_lines, exit_code);
        gate.open();
        spawner
    }

    /// Everything spawned so far.
    pub fn spawn_records(&self) -> Arc<Mutex<Vec<SpawnRecord>>> {
        self.spawned.clone()
    }
}

struct MockHandle {
    gate_rx: Receiver<()>,
    exit_code: i32,
}

#[async_trait]
impl ProcessHandle for MockHandle {
    fn pid(&self) -> Option<u32> {
        Some(4242)
    }

    async fn wait(&mut self) -> process_executor::Result<ExitStatus> {
        // Resolves when the gate is opened (channel closed) or poked.
        let _ = self.gate_rx.recv().await;
        Ok(ExitStatus::from_code(self.exit_code))
    }

    async fn kill(&mut self) -> process_executor::Result<()> {
        Ok(())
    }
}

#[async_trait]
impl Spawner for MockSpawner {
    async fn spawn(
        &self,
        command: Command,
    ) -> process_executor::Result<(EventStream, Box<dyn ProcessHandle>)> {
        self.spawned.lock().unwrap().push(SpawnRecord {
            program: command.get_program().to_string_lossy().into_owned(),
            args: command
                .get_args()
                .iter()
                .map(|arg: &OsString| arg.to_string_lossy().into_owned())
                .collect(),
        });

        let mut events = vec![ProcessEvent::new(ProcessEventType::Started { pid: 4242 })];
        events.extend(
            self.output_lines
                .iter()
                .map(|line| ProcessEvent::new_with_data(ProcessEventType::Stdout, line.clone())),
        );
        let stream: EventStream = Box::pin(stream::iter(events));

        let handle = MockHandle {
            gate_rx: self.gate_rx.clone(),
            exit_code: self.exit_code,
        };
        Ok((stream, Box::new(handle)))
    }
}

/// A launch environment over a temporary home folder with a boot jar
/// already in place.
pub fn test_environment(spawner: Arc<dyn Spawner>, home_dir: &Path) -> LaunchEnvironment {
    let home = GalasaHome::from_path(home_dir);
    home.initialise().unwrap();
    std::fs::write(home_dir.join("lib").join("galasa-boot-0.43.0.jar"), "").unwrap();

    LaunchEnvironment {
        spawner,
        home,
        bootstrap_props: BootstrapProperties::new(),
        java_home: "/opt/java".to_string(),
        separator: '/',
        user_home: Some(std::path::PathBuf::from("/home/testuser")),
        galasa_version: "0.43.0".to_string(),
        remote_maven_repos: vec!["https://development.galasa.dev/main/maven-repo/obr".to_string()],
        local_maven: None,
        is_trace_enabled: false,
        is_debug_enabled: false,
        debug_port: 0,
        debug_mode: None,
    }
}
