//! CSV emission for the diagnostic traces.

use std::io::{self, Write};

use lumen_ir::{StepTrace, TimingSample};

/// Write the lighting log: one row per step transition.
pub fn write_led_log<W: Write>(w: &mut W, trace: &[StepTrace]) -> io::Result<()> {
    writeln!(w, "tick,time_us,write_time_us")?;
    for t in trace {
        writeln!(w, "{},{},{}", t.tick, t.elapsed_us, t.write_us)?;
    }
    Ok(())
}

/// Write the audio log: one row per cycle, then summary rows for
/// average runtime, max runtime and the underrun total.
pub fn write_audio_log<W: Write>(
    w: &mut W,
    trace: &[TimingSample],
    underruns: u64,
) -> io::Result<()> {
    writeln!(w, "index,runtime_us,wake_interval_us,jitter_us")?;

    let mut sum = 0i64;
    let mut max = 0i64;
    for s in trace {
        writeln!(
            w,
            "{},{},{},{}",
            s.cycle,
            s.runtime_us,
            s.wake_interval_us.unwrap_or(0),
            s.jitter_us
        )?;
        sum += s.runtime_us;
        max = max.max(s.runtime_us);
    }

    let avg = if trace.is_empty() {
        0.0
    } else {
        sum as f64 / trace.len() as f64
    };
    writeln!(w)?;
    writeln!(w, "Average (us),{:.6}", avg)?;
    writeln!(w, "Max (us),{}", max)?;
    writeln!(w, "Total underruns,{}", underruns)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn led_log_layout() {
        let trace = vec![
            StepTrace {
                tick: 0,
                elapsed_us: 12,
                write_us: 3,
            },
            StepTrace {
                tick: 7,
                elapsed_us: 70_011,
                write_us: 2,
            },
        ];
        let mut out = Vec::new();
        write_led_log(&mut out, &trace).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "tick,time_us,write_time_us\n0,12,3\n7,70011,2\n"
        );
    }

    #[test]
    fn audio_log_layout_and_summary() {
        let trace = vec![
            TimingSample {
                cycle: 0,
                runtime_us: 100,
                wake_interval_us: None,
                jitter_us: 5,
            },
            TimingSample {
                cycle: 1,
                runtime_us: 300,
                wake_interval_us: Some(30_000),
                jitter_us: 8,
            },
        ];
        let mut out = Vec::new();
        write_audio_log(&mut out, &trace, 3).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("index,runtime_us,wake_interval_us,jitter_us\n"));
        assert!(text.contains("0,100,0,5\n"));
        assert!(text.contains("1,300,30000,8\n"));
        assert!(text.contains("\nAverage (us),200.000000\n"));
        assert!(text.contains("Max (us),300\n"));
        assert!(text.ends_with("Total underruns,3\n"));
    }

    #[test]
    fn empty_audio_log_still_has_summary() {
        let mut out = Vec::new();
        write_audio_log(&mut out, &[], 0).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Average (us),0.000000"));
        assert!(text.contains("Total underruns,0"));
    }
}
