//! Controller status queries
//!
//! Each query is a single driver call wrapped by the session lock, with
//! light value translation on the way out.

use meldas_core::constants::{
    RUN_STATUS_AUTO_QUERY, alarm, magazine, spindle, tool_offset, version,
};
use meldas_types::{Axis, ProgramType, RunStatus};

use crate::error::Result;
use crate::session::Session;

impl Session {
    /// Available drive tokens.
    ///
    /// The controller reports `DRIVE:\r\n` repeated; only the first
    /// token is returned, as four characters (`M01:`).
    pub fn drive_information(&self) -> Result<String> {
        self.with_session(|link| {
            let (code, drives) = link.driver.drive_information();
            self.check(code)?;
            Ok(drives.chars().take(4).collect())
        })
    }

    /// NC software version string
    pub fn version(&self) -> Result<String> {
        self.with_session(|link| {
            let (code, version) = link.driver.system_version(version::KIND_NC, version::UNIT_MAIN);
            self.check(code)?;
            Ok(version)
        })
    }

    /// Current machine position of one axis
    pub fn current_position(&self, axis: Axis) -> Result<f64> {
        self.with_session(|link| {
            let (code, position) = link.driver.current_position(axis.code());
            self.check(code)?;
            Ok(position)
        })
    }

    /// Whether a program is running in automatic operation
    pub fn run_status(&self) -> Result<RunStatus> {
        self.with_session(|link| {
            let (code, status) = link.driver.run_status(RUN_STATUS_AUTO_QUERY);
            self.check(code)?;
            Ok(RunStatus::from_code(status))
        })
    }

    /// Spindle rotation speed, rpm
    pub fn spindle_speed(&self) -> Result<i32> {
        self.spindle_monitor(spindle::SPEED)
    }

    /// Spindle motor load, percent
    pub fn spindle_load(&self) -> Result<i32> {
        self.spindle_monitor(spindle::LOAD)
    }

    fn spindle_monitor(&self, param: i32) -> Result<i32> {
        self.with_session(|link| {
            let (code, data, _info) = link.driver.spindle_monitor(param, spindle::SPINDLE_NO);
            self.check(code)?;
            Ok(data)
        })
    }

    /// Total magazine pot count
    pub fn magazine_size(&self) -> Result<i32> {
        self.with_session(|link| {
            let (code, size) = link.driver.magazine_size();
            self.check(code)?;
            Ok(size)
        })
    }

    /// Tool number currently mounted in the spindle
    pub fn ready_tool(&self) -> Result<i32> {
        self.with_session(|link| {
            let (code, tool_no) = link
                .driver
                .magazine_ready(magazine::MAGAZINE_NO, magazine::MOUNTED);
            self.check(code)?;
            Ok(tool_no)
        })
    }

    /// Number of tool offset sets
    pub fn toolset_size(&self) -> Result<i32> {
        self.with_session(|link| {
            let (code, size) = link.driver.toolset_size();
            self.check(code)?;
            Ok(size)
        })
    }

    /// Length offset of one tool set
    pub fn tool_length_offset(&self, toolset_no: i32) -> Result<f64> {
        self.tool_offset(tool_offset::LENGTH, toolset_no)
    }

    /// Radius offset of one tool set
    pub fn tool_radius_offset(&self, toolset_no: i32) -> Result<f64> {
        self.tool_offset(tool_offset::RADIUS, toolset_no)
    }

    fn tool_offset(&self, kind: i32, toolset_no: i32) -> Result<f64> {
        self.with_session(|link| {
            let (code, offset, _tip_no) =
                link.driver.tool_offset(tool_offset::TYPE_2, kind, toolset_no);
            self.check(code)?;
            Ok(offset)
        })
    }

    /// Set the length offset of one tool set
    pub fn set_tool_length_offset(&self, toolset_no: i32, offset: f64) -> Result<()> {
        self.set_tool_offset(tool_offset::LENGTH, toolset_no, offset)
    }

    /// Set the radius offset of one tool set
    pub fn set_tool_radius_offset(&self, toolset_no: i32, offset: f64) -> Result<()> {
        self.set_tool_offset(tool_offset::RADIUS, toolset_no, offset)
    }

    fn set_tool_offset(&self, kind: i32, toolset_no: i32, offset: f64) -> Result<()> {
        self.with_session(|link| {
            let code = link
                .driver
                .set_tool_offset(tool_offset::TYPE_2, kind, toolset_no, offset, 0);
            self.check(code)
        })
    }

    /// Program number searched or running (main or sub)
    pub fn program_number(&self, program_type: ProgramType) -> Result<String> {
        self.with_session(|link| {
            let (code, number) = link.driver.program_number(program_type.code());
            self.check(code)?;
            Ok(number)
        })
    }

    /// Active alarm message text
    pub fn alarm_message(&self) -> Result<String> {
        self.with_session(|link| {
            let (code, message) = link.driver.alarm_message(alarm::LINES, alarm::TYPE_ALL);
            self.check(code)?;
            Ok(message)
        })
    }
}
