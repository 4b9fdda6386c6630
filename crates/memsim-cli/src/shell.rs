//! Interactive menus driving a [`Simulator`].
//!
//! The shell reads one command per line. End of input leaves every menu and
//! ends the session.

use std::{
    io::{self, BufRead, Write},
    num::NonZeroUsize,
};

use memsim::{FitPolicy, ProcessId, Simulator};
use snafu::{ResultExt as _, Snafu};
use snafu_utils::Location;

use crate::map;

pub const DEFAULT_GRANULARITY: NonZeroUsize = NonZeroUsize::new(2048).unwrap();
pub const DEFAULT_MAP_WIDTH: NonZeroUsize = NonZeroUsize::new(60).unwrap();

/// How occupancy maps are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayConfig {
    /// Bytes per cell of the contiguous map.
    pub granularity: NonZeroUsize,
    /// Maximum number of glyphs per map.
    pub width: NonZeroUsize,
    pub color: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            granularity: DEFAULT_GRANULARITY,
            width: DEFAULT_MAP_WIDTH,
            color: true,
        }
    }
}

#[derive(Debug, Snafu)]
#[snafu(module)]
pub enum ShellError {
    #[snafu(display("failed to read command"))]
    ReadInput {
        #[snafu(source)]
        source: io::Error,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("failed to write output"))]
    WriteOutput {
        #[snafu(source)]
        source: io::Error,
        #[snafu(implicit)]
        location: Location,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Back,
    Quit,
}

pub struct Shell<R, W> {
    sim: Simulator,
    display: DisplayConfig,
    input: R,
    output: W,
}

macro_rules! say {
    ($shell:expr, $($arg:tt)*) => {
        writeln!($shell.output, $($arg)*).context(shell_error::WriteOutputSnafu)
    };
}

impl<R, W> Shell<R, W>
where
    R: BufRead,
    W: Write,
{
    pub fn new(sim: Simulator, display: DisplayConfig, input: R, output: W) -> Self {
        Self {
            sim,
            display,
            input,
            output,
        }
    }

    #[must_use]
    pub fn simulator(&self) -> &Simulator {
        &self.sim
    }

    /// Consumes the shell and returns the output sink.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Runs the main menu until the user exits or input ends.
    pub fn run(&mut self) -> Result<(), ShellError> {
        loop {
            say!(self, "\nMemory Management Simulator")?;
            say!(self, "1) Contiguous dynamic allocation")?;
            say!(self, "2) Pure paging")?;
            say!(self, "0) Exit")?;
            let Some(choice) = self.prompt("> ")? else {
                return Ok(());
            };
            let flow = match choice.as_str() {
                "1" => self.contiguous_menu()?,
                "2" => self.paging_menu()?,
                "0" => Flow::Quit,
                other => {
                    say!(self, "Unknown option: {other}")?;
                    Flow::Back
                }
            };
            if flow == Flow::Quit {
                return Ok(());
            }
        }
    }

    fn prompt(&mut self, message: &str) -> Result<Option<String>, ShellError> {
        #[cfg_attr(not(test), expect(clippy::wildcard_imports))]
        use shell_error::*;

        write!(self.output, "{message}").context(WriteOutputSnafu)?;
        self.output.flush().context(WriteOutputSnafu)?;
        let mut line = String::new();
        let n = self.input.read_line(&mut line).context(ReadInputSnafu)?;
        if n == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_owned()))
    }

    /// Prompts for a number. `Ok(None)` means input ended, `Ok(Some(None))`
    /// means the answer was not a number and has already been reported.
    fn prompt_number(&mut self, message: &str) -> Result<Option<Option<usize>>, ShellError> {
        let Some(text) = self.prompt(message)? else {
            return Ok(None);
        };
        match text.parse() {
            Ok(n) => Ok(Some(Some(n))),
            Err(_) => {
                say!(self, "Invalid number: {text:?}")?;
                Ok(Some(None))
            }
        }
    }

    fn show_map<T>(&mut self, cells: &[Option<T>]) -> Result<(), ShellError> {
        let line = map::render(cells, self.display.width, self.display.color);
        say!(self, "{line}")?;
        say!(self, "{}", map::LEGEND)
    }

    fn contiguous_menu(&mut self) -> Result<Flow, ShellError> {
        loop {
            let policy = self.sim.policy();
            say!(self, "\nContiguous mode (policy: {policy})")?;
            let cells = self.sim.contiguous().snapshot(self.display.granularity);
            self.show_map(&cells)?;
            let rows: Vec<String> = self
                .sim
                .contiguous()
                .processes()
                .map(|p| format!("PID {} | Base {} | Limit {}", p.pid, p.base, p.limit))
                .collect();
            for row in rows {
                say!(self, "{row}")?;
            }
            let frag = self.sim.contiguous().external_fragmentation();
            say!(self, "External fragmentation: {frag:.2}%")?;
            say!(self, "\n1) Create process")?;
            say!(self, "2) Remove process")?;
            say!(self, "3) Change policy")?;
            say!(self, "0) Back")?;

            let Some(cmd) = self.prompt("> ")? else {
                return Ok(Flow::Quit);
            };
            match cmd.as_str() {
                "1" => {
                    let Some(answer) = self.prompt_number("Process size in bytes: ")? else {
                        return Ok(Flow::Quit);
                    };
                    if let Some(size) = answer {
                        match self.sim.create_contiguous(size) {
                            Ok(pid) => say!(self, "Process {pid} created")?,
                            Err(err) => say!(self, "Allocation failed: {err}")?,
                        }
                    }
                }
                "2" => {
                    if self.remove(Simulator::remove_contiguous)? == Flow::Quit {
                        return Ok(Flow::Quit);
                    }
                }
                "3" => {
                    let Some(name) = self.prompt("Policy (first/best/worst/circular): ")? else {
                        return Ok(Flow::Quit);
                    };
                    match name.parse::<FitPolicy>() {
                        Ok(policy) => {
                            self.sim.set_policy(policy);
                            say!(self, "Policy set to {policy}")?;
                        }
                        Err(err) => say!(self, "{err}")?,
                    }
                }
                "0" => return Ok(Flow::Back),
                other => say!(self, "Unknown option: {other}")?,
            }
        }
    }

    fn paging_menu(&mut self) -> Result<Flow, ShellError> {
        loop {
            let paging = self.sim.paging();
            let (page_size, frames) = (paging.page_size(), paging.total_frames());
            say!(
                self,
                "\nPaging mode (page size: {page_size} bytes, {frames} frames)"
            )?;
            let cells = self.sim.paging().snapshot();
            self.show_map(&cells)?;
            let rows: Vec<String> = self
                .sim
                .paging()
                .processes()
                .map(|p| format!("PID {} | {} bytes | {} pages", p.pid, p.size, p.pages))
                .collect();
            for row in rows {
                say!(self, "{row}")?;
            }
            let internal = self.sim.paging().internal_fragmentation();
            let external = self.sim.paging().external_fragmentation();
            say!(self, "Internal fragmentation: {internal:.2}%")?;
            say!(
                self,
                "External fragmentation: {external:.2}% (does not apply to paging)"
            )?;
            say!(self, "\n1) Create process")?;
            say!(self, "2) Remove process")?;
            say!(self, "3) Show page table")?;
            say!(self, "0) Back")?;

            let Some(cmd) = self.prompt("> ")? else {
                return Ok(Flow::Quit);
            };
            match cmd.as_str() {
                "1" => {
                    let Some(answer) = self.prompt_number("Process size in bytes: ")? else {
                        return Ok(Flow::Quit);
                    };
                    if let Some(size) = answer {
                        match self.sim.create_paged(size) {
                            Ok(pid) => say!(self, "Process {pid} created")?,
                            Err(err) => say!(self, "Allocation failed: {err}")?,
                        }
                    }
                }
                "2" => {
                    if self.remove(Simulator::remove_paged)? == Flow::Quit {
                        return Ok(Flow::Quit);
                    }
                }
                "3" => {
                    let Some(answer) = self.prompt_number("PID: ")? else {
                        return Ok(Flow::Quit);
                    };
                    if let Some(id) = answer {
                        self.show_page_table(ProcessId::new(id))?;
                    }
                }
                "0" => return Ok(Flow::Back),
                other => say!(self, "Unknown option: {other}")?,
            }
        }
    }

    fn remove(
        &mut self,
        remove: fn(&mut Simulator, ProcessId) -> Result<(), memsim::AllocError>,
    ) -> Result<Flow, ShellError> {
        let Some(answer) = self.prompt_number("PID: ")? else {
            return Ok(Flow::Quit);
        };
        if let Some(id) = answer {
            let pid = ProcessId::new(id);
            match remove(&mut self.sim, pid) {
                Ok(()) => say!(self, "Process {pid} removed")?,
                Err(err) => say!(self, "Removal failed: {err}")?,
            }
        }
        Ok(Flow::Back)
    }

    fn show_page_table(&mut self, pid: ProcessId) -> Result<(), ShellError> {
        let rows: Vec<String> = self
            .sim
            .paging()
            .page_table_for(pid)
            .iter()
            .map(|pte| format!("Page {} -> Frame {}", pte.page_number, pte.frame_number))
            .collect();
        if rows.is_empty() {
            return say!(self, "No page table for PID {pid}");
        }
        for row in rows {
            say!(self, "{row}")?;
        }
        Ok(())
    }
}
