//! Counters and timing for render calls.
//!
//! Every call to [`render`][super::render] returns a [`Stats`] describing
//! the work done and also adds it to the running total in the
//! [`Context`][super::Context]. The totals can be printed as a small
//! table, or averaged over time or frames.

use alloc::{format, string::String};
use core::fmt::{self, Display, Formatter};
use core::ops::AddAssign;
use core::time::Duration;
#[cfg(feature = "std")]
use std::time::Instant;

/// Work done by one or more render calls.
#[derive(Clone, Debug, Default)]
pub struct Stats {
    /// Wall-clock time spent. Always zero without the `std` feature.
    pub time: Duration,
    /// Number of render calls.
    pub calls: f64,
    /// Number of frames. Render calls do not count these; the caller
    /// should increment this once per finished frame.
    pub frames: f64,

    /// Triangles submitted, and triangles that survived culling.
    pub prims: Throughput,
    /// Vertices shaded, and vertices of triangles that survived culling.
    pub verts: Throughput,
    /// Pixels covered, and pixels that passed the depth test and were
    /// written.
    pub frags: Throughput,

    #[cfg(feature = "std")]
    started: Option<Instant>,
}

/// A count of items going into and coming out of a pipeline stage.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Throughput {
    /// Items in.
    pub i: usize,
    /// Items out.
    pub o: usize,
}

impl Stats {
    /// Returns empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns empty stats with a running timer.
    ///
    /// The timer is stopped by [`finish`][Self::finish]. Without the `std`
    /// feature there is no clock, and this is the same as [`Stats::new`].
    pub fn start() -> Self {
        Self {
            #[cfg(feature = "std")]
            started: Some(Instant::now()),
            ..Self::default()
        }
    }

    /// Stops the timer, if running, and stores the elapsed time.
    pub fn finish(self) -> Self {
        #[cfg(feature = "std")]
        if let Some(t) = self.started {
            return Self { time: t.elapsed(), started: None, ..self };
        }
        self
    }

    /// Returns the averages per second of recorded time.
    ///
    /// If no time was recorded, returns the totals as they are.
    pub fn per_sec(&self) -> Self {
        let secs = match self.time.as_secs_f64() {
            s if s > 0.0 => s,
            _ => 1.0,
        };
        Self {
            time: Duration::from_secs(1),
            frames: self.frames / secs,
            ..self.averaged(secs)
        }
    }

    /// Returns the averages per frame. At least one frame is assumed.
    pub fn per_frame(&self) -> Self {
        let frames = self.frames.max(1.0);
        Self {
            time: self.time.div_f64(frames),
            frames: 1.0,
            ..self.averaged(frames)
        }
    }

    /// Divides the calls and throughput counts by `n`.
    fn averaged(&self, n: f64) -> Self {
        Self {
            calls: self.calls / n,
            prims: self.prims.div(n),
            verts: self.verts.div(n),
            frags: self.frags.div(n),
            ..Self::default()
        }
    }

    fn rows(&self) -> [(&'static str, Throughput); 3] {
        [("prims", self.prims), ("verts", self.verts), ("frags", self.frags)]
    }
}

impl Throughput {
    /// Returns the fraction of input items that made it to the output,
    /// or `None` if there was no input.
    pub fn ratio(&self) -> Option<f64> {
        (self.i > 0).then(|| self.o as f64 / self.i as f64)
    }

    fn div(self, n: f64) -> Self {
        Self {
            i: (self.i as f64 / n) as usize,
            o: (self.o as f64 / n) as usize,
        }
    }
}

const CELL: usize = 12;

/// Prints a table of totals, per-frame averages, and per-second averages.
///
/// With the alternate flag (`{:#}`), throughput cells show the percentage
/// of items output instead of the item counts.
impl Display for Stats {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let per_f = self.per_frame();
        let per_s = self.per_sec();
        let alt = f.alternate();

        writeln!(
            f,
            "{:<6} {:>CELL$} {:>CELL$} {:>CELL$}",
            "", "total", "per frame", "per sec"
        )?;
        writeln!(
            f,
            "{:<6} {:>CELL$} {:>CELL$} {:>CELL$}",
            "time",
            human_time(self.time),
            human_time(per_f.time),
            "-"
        )?;
        writeln!(
            f,
            "{:<6} {:>CELL$} {:>CELL$.1} {:>CELL$.1}",
            "calls", self.calls, per_f.calls, per_s.calls
        )?;
        writeln!(
            f,
            "{:<6} {:>CELL$} {:>CELL$} {:>CELL$.1}",
            "frames", self.frames, "-", per_s.frames
        )?;

        let rows = self.rows().into_iter().zip(per_f.rows()).zip(per_s.rows());
        for (((label, tot), (_, pf)), (_, ps)) in rows {
            let [tot, pf, ps] = [tot, pf, ps].map(|t| cell(t, alt));
            writeln!(f, "{label:<6} {tot:>CELL$} {pf:>CELL$} {ps:>CELL$}")?;
        }
        Ok(())
    }
}

/// Prints `out/in`, or the percentage of items output if the alternate
/// flag is set. Honors width and alignment.
impl Display for Throughput {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.pad(&cell(*self, f.alternate()))
    }
}

fn cell(t: Throughput, pct: bool) -> String {
    match (pct, t.ratio()) {
        (true, Some(r)) => format!("{:.1}%", 100.0 * r),
        (true, None) => "-".into(),
        (false, _) => format!("{}/{}", human_num(t.o), human_num(t.i)),
    }
}

impl AddAssign for Stats {
    fn add_assign(&mut self, rhs: Self) {
        self.time += rhs.time;
        self.calls += rhs.calls;
        self.frames += rhs.frames;
        self.prims += rhs.prims;
        self.verts += rhs.verts;
        self.frags += rhs.frags;
    }
}

impl AddAssign for Throughput {
    fn add_assign(&mut self, rhs: Self) {
        self.i += rhs.i;
        self.o += rhs.o;
    }
}

/// Formats `n` with one decimal and an SI suffix if it is 1000 or more.
fn human_num(n: usize) -> String {
    const SUFFIXES: [&str; 4] = ["", "k", "M", "G"];
    let mut x = n as f64;
    let mut i = 0;
    while x >= 1000.0 && i < SUFFIXES.len() - 1 {
        x /= 1000.0;
        i += 1;
    }
    if i == 0 {
        format!("{n}")
    } else {
        format!("{x:.1}{}", SUFFIXES[i])
    }
}

fn human_time(d: Duration) -> String {
    let s = d.as_secs_f64();
    if s < 1e-3 {
        format!("{:.1}µs", s * 1e6)
    } else if s < 1.0 {
        format!("{:.1}ms", s * 1e3)
    } else {
        format!("{s:.2}s")
    }
}
