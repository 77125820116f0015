//! In-memory controller double
//!
//! [`SimController`] models just enough controller state to exercise the
//! client end to end without hardware: NC files, bit/word devices, one
//! directory namespace, canned status values, and injectable faults.
//! [`SimController::driver`] hands out [`SimDriver`] connections that
//! answer with the same status codes a real controller would.
//!
//! One staging table is shared by all connections, which is enough for
//! the single-session scenarios the double exists for.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Arc;

use bytes::Bytes;
use parking_lot::Mutex;

use meldas_core::fault::NOT_CONNECTED;

use crate::{Driver, Status};

const DUPLICATE_OPEN: Status = 0x80A0_0104;
const INVALID_HOST_NAME: Status = 0x80B0_0301;
const INVALID_MODE: Status = 0x80B0_0201;
const NO_FILE_OPEN: Status = 0x80B0_0202;
const FILE_ALREADY_OPEN: Status = 0x80B0_0204;
const NOT_OPEN_FOR_WRITE: Status = 0x80B0_0206;
const NOT_OPEN_FOR_READ: Status = 0x80B0_0209;
const READ_FILE_MISSING: Status = 0x80B0_020C;
const DELETE_FILE_MISSING: Status = 0x8003_0242;
const DIR_MISSING: Status = 0x8003_0191;
const DIR_NOT_OPENED: Status = 0x8007_0B90;
const DEVICE_NOT_OPENED: Status = 0x8002_0102;
const INVALID_SYSTEM_OR_AXIS: Status = 0x8005_0D90;
const INVALID_ARGUMENT: Status = 0xF000_00FF;

/// Where an injected fault fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailPoint {
    /// The very next driver call, whatever it is
    NextCall,
    /// The next `open_unit` call
    OpenUnit,
    /// The next `read_file` call
    ReadFile,
    /// The next `write_devices` call
    WriteDevices,
    /// The next `reset_dir` call
    ResetDir,
}

#[derive(Debug, Clone, Default)]
struct SimDirFile {
    name: String,
    size: u64,
    comment: Option<String>,
}

#[derive(Debug, Clone, Default)]
struct SimDir {
    folders: Vec<(String, u64)>,
    files: Vec<SimDirFile>,
}

#[derive(Debug)]
struct Failure {
    at: FailPoint,
    code: Status,
    skip: u32,
}

#[derive(Debug)]
struct State {
    files: BTreeMap<String, Vec<u8>>,
    dirs: BTreeMap<String, SimDir>,
    devices: HashMap<String, i32>,
    staged: Vec<(String, i32, i32)>,
    units_open: Vec<u8>,
    units_seen: Vec<u8>,
    open_count: u32,
    last_find_path: Option<String>,
    failures: Vec<Failure>,

    positions: [f64; 3],
    run_status: i32,
    spindle_speed: i32,
    spindle_load: i32,
    magazine_size: i32,
    ready_tool: i32,
    toolset_size: i32,
    offsets: HashMap<(i32, i32), f64>,
    program_main: String,
    program_sub: String,
    alarm: String,
    version: String,
    drives: String,
}

impl Default for State {
    fn default() -> Self {
        Self {
            files: BTreeMap::new(),
            dirs: BTreeMap::new(),
            devices: HashMap::new(),
            staged: Vec::new(),
            units_open: Vec::new(),
            units_seen: Vec::new(),
            open_count: 0,
            last_find_path: None,
            failures: Vec::new(),
            positions: [0.0; 3],
            run_status: 0,
            spindle_speed: 0,
            spindle_load: 0,
            magazine_size: 30,
            ready_tool: 0,
            toolset_size: 200,
            offsets: HashMap::new(),
            program_main: "100".to_owned(),
            program_sub: "0".to_owned(),
            alarm: String::new(),
            version: "BND-1006W000-A0".to_owned(),
            drives: "M01:\r\nD01:\r\n".to_owned(),
        }
    }
}

impl State {
    fn take_fault(&mut self, point: FailPoint) -> Option<Status> {
        let index = self
            .failures
            .iter()
            .position(|failure| failure.at == point || failure.at == FailPoint::NextCall)?;
        let failure = &mut self.failures[index];
        if failure.skip > 0 {
            failure.skip -= 1;
            return None;
        }
        Some(self.failures.remove(index).code)
    }
}

/// Shared simulated controller
///
/// Clones share the same state; seed it, hand [`SimDriver`]s to the
/// client, then inspect what happened.
#[derive(Debug, Clone, Default)]
pub struct SimController {
    state: Arc<Mutex<State>>,
}

impl SimController {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh, closed connection to this controller
    pub fn driver(&self) -> SimDriver {
        SimDriver {
            state: Arc::clone(&self.state),
            connected: false,
            unit: None,
            handle: None,
            scan: None,
        }
    }

    // Seeding

    pub fn add_file(&self, path: &str, contents: &[u8]) {
        self.state
            .lock()
            .files
            .insert(path.to_owned(), contents.to_vec());
    }

    pub fn add_dir(&self, path: &str) {
        self.state.lock().dirs.entry(path.to_owned()).or_default();
    }

    pub fn add_folder(&self, dir: &str, name: &str, size: u64) {
        self.state
            .lock()
            .dirs
            .entry(dir.to_owned())
            .or_default()
            .folders
            .push((name.to_owned(), size));
    }

    pub fn add_dir_file(&self, dir: &str, name: &str, size: u64, comment: Option<&str>) {
        self.state
            .lock()
            .dirs
            .entry(dir.to_owned())
            .or_default()
            .files
            .push(SimDirFile {
                name: name.to_owned(),
                size,
                comment: comment.map(str::to_owned),
            });
    }

    pub fn set_device(&self, name: &str, value: i32) {
        self.state.lock().devices.insert(name.to_owned(), value);
    }

    pub fn set_positions(&self, x: f64, y: f64, z: f64) {
        self.state.lock().positions = [x, y, z];
    }

    pub fn set_run_status(&self, code: i32) {
        self.state.lock().run_status = code;
    }

    pub fn set_spindle(&self, speed: i32, load: i32) {
        let mut state = self.state.lock();
        state.spindle_speed = speed;
        state.spindle_load = load;
    }

    pub fn set_magazine(&self, size: i32, ready_tool: i32) {
        let mut state = self.state.lock();
        state.magazine_size = size;
        state.ready_tool = ready_tool;
    }

    pub fn set_toolset_size(&self, size: i32) {
        self.state.lock().toolset_size = size;
    }

    pub fn set_program_numbers(&self, main: &str, sub: &str) {
        let mut state = self.state.lock();
        state.program_main = main.to_owned();
        state.program_sub = sub.to_owned();
    }

    pub fn set_alarm(&self, text: &str) {
        self.state.lock().alarm = text.to_owned();
    }

    pub fn set_version(&self, version: &str) {
        self.state.lock().version = version.to_owned();
    }

    pub fn set_drives(&self, drives: &str) {
        self.state.lock().drives = drives.to_owned();
    }

    /// Make one upcoming call answer `code` instead of doing its job
    pub fn inject_fault(&self, at: FailPoint, code: Status) {
        self.inject_fault_after(at, code, 0);
    }

    /// Like [`inject_fault`](SimController::inject_fault), but let the
    /// first `skip` matching calls through first
    pub fn inject_fault_after(&self, at: FailPoint, code: Status, skip: u32) {
        self.state.lock().failures.push(Failure { at, code, skip });
    }

    // Inspection

    pub fn file(&self, path: &str) -> Option<Vec<u8>> {
        self.state.lock().files.get(path).cloned()
    }

    pub fn device(&self, name: &str) -> i32 {
        self.state.lock().devices.get(name).copied().unwrap_or(0)
    }

    /// How many times a connection was opened
    pub fn open_count(&self) -> u32 {
        self.state.lock().open_count
    }

    /// Unit numbers in the order connections were opened with them
    pub fn units_seen(&self) -> Vec<u8> {
        self.state.lock().units_seen.clone()
    }

    /// Unit numbers of connections that are open right now
    pub fn open_units(&self) -> Vec<u8> {
        self.state.lock().units_open.clone()
    }

    /// The path handed to the most recent `find_first`
    pub fn last_find_path(&self) -> Option<String> {
        self.state.lock().last_find_path.clone()
    }

    /// Devices currently staged (empty after a completed cycle)
    pub fn staged_count(&self) -> usize {
        self.state.lock().staged.len()
    }
}

#[derive(Debug)]
enum FileHandle {
    Read { content: Vec<u8>, pos: usize },
    Write { path: String, buf: Vec<u8> },
}

/// One simulated driver connection
#[derive(Debug)]
pub struct SimDriver {
    state: Arc<Mutex<State>>,
    connected: bool,
    unit: Option<u8>,
    handle: Option<FileHandle>,
    scan: Option<VecDeque<String>>,
}

impl SimDriver {
    /// Injected fault, or a disconnect fault when the connection is down
    fn guard(&mut self, point: FailPoint) -> Option<Status> {
        if let Some(code) = self.state.lock().take_fault(point) {
            return Some(code);
        }
        if !self.connected {
            return Some(NOT_CONNECTED);
        }
        None
    }

    fn next_record(&mut self) -> (Status, String) {
        match self.scan.as_mut().and_then(|queue| queue.pop_front()) {
            Some(record) => {
                let remaining = self.scan.as_ref().map_or(0, VecDeque::len);
                (remaining as Status + 1, record)
            }
            None => (0, String::new()),
        }
    }
}

impl Driver for SimDriver {
    fn set_tcpip(&mut self, _host: &str, _port: u16) -> Status {
        if let Some(code) = self.state.lock().take_fault(FailPoint::NextCall) {
            return code;
        }
        0
    }

    fn open_unit(
        &mut self,
        machine_type: i32,
        unit_no: u8,
        _timeout: i32,
        host_name: &str,
    ) -> Status {
        let mut state = self.state.lock();
        if let Some(code) = state.take_fault(FailPoint::OpenUnit) {
            return code;
        }
        if machine_type != 6 {
            return INVALID_ARGUMENT;
        }
        if host_name != "EZNC_LOCALHOST" {
            return INVALID_HOST_NAME;
        }
        if state.units_open.contains(&unit_no) {
            return DUPLICATE_OPEN;
        }
        state.units_open.push(unit_no);
        state.units_seen.push(unit_no);
        state.open_count += 1;
        drop(state);
        self.connected = true;
        self.unit = Some(unit_no);
        0
    }

    fn close(&mut self) -> Status {
        if let Some(unit) = self.unit.take() {
            self.state.lock().units_open.retain(|open| *open != unit);
        }
        self.connected = false;
        self.handle = None;
        self.scan = None;
        0
    }

    fn drive_information(&mut self) -> (Status, String) {
        if let Some(code) = self.guard(FailPoint::NextCall) {
            return (code, String::new());
        }
        (0, self.state.lock().drives.clone())
    }

    fn system_version(&mut self, _kind: i32, _unit: i32) -> (Status, String) {
        if let Some(code) = self.guard(FailPoint::NextCall) {
            return (code, String::new());
        }
        (0, self.state.lock().version.clone())
    }

    fn current_position(&mut self, axis: i32) -> (Status, f64) {
        if let Some(code) = self.guard(FailPoint::NextCall) {
            return (code, 0.0);
        }
        match axis {
            1..=3 => (0, self.state.lock().positions[axis as usize - 1]),
            _ => (INVALID_SYSTEM_OR_AXIS, 0.0),
        }
    }

    fn run_status(&mut self, kind: i32) -> (Status, i32) {
        if let Some(code) = self.guard(FailPoint::NextCall) {
            return (code, 0);
        }
        if kind != 1 {
            return (INVALID_ARGUMENT, 0);
        }
        (0, self.state.lock().run_status)
    }

    fn spindle_monitor(&mut self, param: i32, _spindle_no: i32) -> (Status, i32, String) {
        if let Some(code) = self.guard(FailPoint::NextCall) {
            return (code, 0, String::new());
        }
        let state = self.state.lock();
        match param {
            2 => (0, state.spindle_speed, String::new()),
            3 => (0, state.spindle_load, String::new()),
            _ => (INVALID_ARGUMENT, 0, String::new()),
        }
    }

    fn magazine_size(&mut self) -> (Status, i32) {
        if let Some(code) = self.guard(FailPoint::NextCall) {
            return (code, 0);
        }
        (0, self.state.lock().magazine_size)
    }

    fn magazine_ready(&mut self, _magazine_no: i32, standby: i32) -> (Status, i32) {
        if let Some(code) = self.guard(FailPoint::NextCall) {
            return (code, 0);
        }
        if standby != 0 {
            return (INVALID_ARGUMENT, 0);
        }
        (0, self.state.lock().ready_tool)
    }

    fn toolset_size(&mut self) -> (Status, i32) {
        if let Some(code) = self.guard(FailPoint::NextCall) {
            return (code, 0);
        }
        (0, self.state.lock().toolset_size)
    }

    fn tool_offset(&mut self, offset_type: i32, kind: i32, toolset_no: i32) -> (Status, f64, i32) {
        if let Some(code) = self.guard(FailPoint::NextCall) {
            return (code, 0.0, 0);
        }
        if offset_type != 4 || !(0..=3).contains(&kind) {
            return (INVALID_ARGUMENT, 0.0, 0);
        }
        let offset = self
            .state
            .lock()
            .offsets
            .get(&(kind, toolset_no))
            .copied()
            .unwrap_or(0.0);
        (0, offset, 0)
    }

    fn set_tool_offset(
        &mut self,
        offset_type: i32,
        kind: i32,
        toolset_no: i32,
        offset: f64,
        _tip_no: i32,
    ) -> Status {
        if let Some(code) = self.guard(FailPoint::NextCall) {
            return code;
        }
        if offset_type != 4 || !(0..=3).contains(&kind) {
            return INVALID_ARGUMENT;
        }
        self.state.lock().offsets.insert((kind, toolset_no), offset);
        0
    }

    fn program_number(&mut self, program_type: i32) -> (Status, String) {
        if let Some(code) = self.guard(FailPoint::NextCall) {
            return (code, String::new());
        }
        let state = self.state.lock();
        match program_type {
            0 => (0, state.program_main.clone()),
            1 => (0, state.program_sub.clone()),
            _ => (INVALID_ARGUMENT, String::new()),
        }
    }

    fn alarm_message(&mut self, _lines: i32, _alarm_type: i32) -> (Status, String) {
        if let Some(code) = self.guard(FailPoint::NextCall) {
            return (code, String::new());
        }
        (0, self.state.lock().alarm.clone())
    }

    fn open_file(&mut self, path: &str, mode: i32) -> Status {
        if let Some(code) = self.guard(FailPoint::NextCall) {
            return code;
        }
        if self.handle.is_some() {
            return FILE_ALREADY_OPEN;
        }
        match mode {
            1 => match self.state.lock().files.get(path) {
                Some(content) => {
                    self.handle = Some(FileHandle::Read {
                        content: content.clone(),
                        pos: 0,
                    });
                    0
                }
                None => READ_FILE_MISSING,
            },
            2 | 3 => {
                self.handle = Some(FileHandle::Write {
                    path: path.to_owned(),
                    buf: Vec::new(),
                });
                0
            }
            _ => INVALID_MODE,
        }
    }

    fn read_file(&mut self, max_len: usize) -> (Status, Bytes) {
        if let Some(code) = self.guard(FailPoint::ReadFile) {
            return (code, Bytes::new());
        }
        match self.handle.as_mut() {
            Some(FileHandle::Read { content, pos }) => {
                let end = (*pos + max_len).min(content.len());
                let chunk = Bytes::copy_from_slice(&content[*pos..end]);
                *pos = end;
                (0, chunk)
            }
            _ => (NOT_OPEN_FOR_READ, Bytes::new()),
        }
    }

    fn write_file(&mut self, data: &[u8]) -> Status {
        if let Some(code) = self.guard(FailPoint::NextCall) {
            return code;
        }
        match self.handle.as_mut() {
            Some(FileHandle::Write { buf, .. }) => {
                buf.extend_from_slice(data);
                0
            }
            _ => NOT_OPEN_FOR_WRITE,
        }
    }

    fn close_file(&mut self) -> Status {
        if let Some(code) = self.state.lock().take_fault(FailPoint::NextCall) {
            return code;
        }
        match self.handle.take() {
            Some(FileHandle::Write { path, buf }) => {
                self.state.lock().files.insert(path, buf);
                0
            }
            Some(FileHandle::Read { .. }) => 0,
            None => NO_FILE_OPEN,
        }
    }

    fn delete_file(&mut self, path: &str) -> Status {
        if let Some(code) = self.guard(FailPoint::NextCall) {
            return code;
        }
        match self.state.lock().files.remove(path) {
            Some(_) => 0,
            None => DELETE_FILE_MISSING,
        }
    }

    fn find_first(&mut self, path: &str, fields: i32) -> (Status, String) {
        if let Some(code) = self.guard(FailPoint::NextCall) {
            return (code, String::new());
        }
        let mut state = self.state.lock();
        state.last_find_path = Some(path.to_owned());
        let Some(dir) = state.dirs.get(path) else {
            return (DIR_MISSING, String::new());
        };
        let records: VecDeque<String> = match fields {
            -1 => dir
                .folders
                .iter()
                .map(|(name, size)| format!("{name}\t{size}"))
                .collect(),
            5 => dir
                .files
                .iter()
                .map(|file| {
                    format!(
                        "{}\t{}\t{}",
                        file.name,
                        file.size,
                        file.comment.as_deref().unwrap_or_default()
                    )
                })
                .collect(),
            _ => return (INVALID_MODE, String::new()),
        };
        drop(state);
        self.scan = Some(records);
        self.next_record()
    }

    fn find_next(&mut self) -> (Status, String) {
        if let Some(code) = self.guard(FailPoint::NextCall) {
            return (code, String::new());
        }
        if self.scan.is_none() {
            return (DIR_NOT_OPENED, String::new());
        }
        self.next_record()
    }

    fn reset_dir(&mut self) -> Status {
        if let Some(code) = self.guard(FailPoint::ResetDir) {
            return code;
        }
        self.scan = None;
        0
    }

    fn set_devices(&mut self, names: &[String], type_codes: &[i32], values: &[i32]) -> Status {
        if let Some(code) = self.guard(FailPoint::NextCall) {
            return code;
        }
        if names.len() != type_codes.len() || names.len() != values.len() {
            return INVALID_ARGUMENT;
        }
        let mut state = self.state.lock();
        state.staged = names
            .iter()
            .zip(type_codes)
            .zip(values)
            .map(|((name, code), value)| (name.clone(), *code, *value))
            .collect();
        0
    }

    fn read_devices(&mut self) -> (Status, Vec<i32>) {
        if let Some(code) = self.guard(FailPoint::NextCall) {
            return (code, Vec::new());
        }
        let state = self.state.lock();
        if state.staged.is_empty() {
            return (DEVICE_NOT_OPENED, Vec::new());
        }
        let values = state
            .staged
            .iter()
            .map(|(name, _, _)| state.devices.get(name).copied().unwrap_or(0))
            .collect();
        (0, values)
    }

    fn write_devices(&mut self) -> Status {
        if let Some(code) = self.guard(FailPoint::WriteDevices) {
            return code;
        }
        let mut state = self.state.lock();
        if state.staged.is_empty() {
            return DEVICE_NOT_OPENED;
        }
        let staged = state.staged.clone();
        for (name, _, value) in staged {
            state.devices.insert(name, value);
        }
        0
    }

    fn clear_devices(&mut self) -> Status {
        if let Some(code) = self.state.lock().take_fault(FailPoint::NextCall) {
            return code;
        }
        self.state.lock().staged.clear();
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open(sim: &SimController, unit: u8) -> SimDriver {
        let mut driver = sim.driver();
        assert_eq!(driver.set_tcpip("10.0.0.5", 683), 0);
        assert_eq!(driver.open_unit(6, unit, 30, "EZNC_LOCALHOST"), 0);
        driver
    }

    #[test]
    fn calls_before_open_report_not_connected() {
        let sim = SimController::new();
        let mut driver = sim.driver();
        let (code, _) = driver.drive_information();
        assert_eq!(code, NOT_CONNECTED);
    }

    #[test]
    fn duplicate_unit_numbers_are_refused() {
        let sim = SimController::new();
        let _first = open(&sim, 1);
        let mut second = sim.driver();
        second.set_tcpip("10.0.0.5", 683);
        assert_eq!(second.open_unit(6, 1, 30, "EZNC_LOCALHOST"), DUPLICATE_OPEN);
        assert_eq!(second.open_unit(6, 2, 30, "EZNC_LOCALHOST"), 0);
        assert_eq!(sim.units_seen(), vec![1, 2]);
    }

    #[test]
    fn wrong_host_token_is_refused() {
        let sim = SimController::new();
        let mut driver = sim.driver();
        driver.set_tcpip("10.0.0.5", 683);
        assert_eq!(driver.open_unit(6, 1, 30, "LOCALHOST"), INVALID_HOST_NAME);
    }

    #[test]
    fn file_write_then_read_round_trips() {
        let sim = SimController::new();
        let mut driver = open(&sim, 1);
        assert_eq!(driver.open_file("M01:\\PRG\\USER\\100", 3), 0);
        assert_eq!(driver.write_file(b"G28 X0 Y0"), 0);
        assert_eq!(driver.close_file(), 0);

        assert_eq!(driver.open_file("M01:\\PRG\\USER\\100", 1), 0);
        let (code, chunk) = driver.read_file(256);
        assert_eq!(code, 0);
        assert_eq!(&chunk[..], b"G28 X0 Y0");
        assert_eq!(driver.close_file(), 0);
    }

    #[test]
    fn scan_counts_down_to_plain_success() {
        let sim = SimController::new();
        sim.add_folder("M01:\\PRG\\", "USER", 0);
        sim.add_folder("M01:\\PRG\\", "FIX", 0);
        let mut driver = open(&sim, 1);
        let (code, record) = driver.find_first("M01:\\PRG\\", -1);
        assert_eq!((code, record.as_str()), (2, "USER\t0"));
        let (code, record) = driver.find_next();
        assert_eq!((code, record.as_str()), (1, "FIX\t0"));
        assert_eq!(driver.find_next(), (0, String::new()));
    }

    #[test]
    fn injected_faults_fire_once() {
        let sim = SimController::new();
        let mut driver = open(&sim, 1);
        sim.inject_fault(FailPoint::NextCall, 0x8202_0014);
        let (code, _) = driver.magazine_size();
        assert_eq!(code, 0x8202_0014);
        let (code, _) = driver.magazine_size();
        assert_eq!(code, 0);
    }
}
