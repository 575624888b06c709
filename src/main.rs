//! lumen — audio-synchronized LED show runner.
//!
//! Loads the show inputs from the working directory, maps the LED
//! hardware, runs the two realtime workers to completion, and writes
//! the diagnostic CSV logs. Takes no command-line arguments; exits 0 on
//! a normal run, 1 when any piece of setup fails.

use std::fs::File;
use std::io::BufWriter;
use std::process;

use lumen_hw::{CpalSink, MappedGpio, DEFAULT_LED_PINS, GPIO_BASE_PI1};
use lumen_show::{write_audio_log, write_led_log, Show, ShowReport};

const AUDIO_FILE: &str = "show.wav";
const PATTERN_FILE: &str = "show_patterns.txt";
const LED_LOG_FILE: &str = "led_log.csv";
const AUDIO_LOG_FILE: &str = "audio_log.csv";

fn main() {
    env_logger::init();

    let audio = lumen_formats::load_wav_file(AUDIO_FILE).unwrap_or_else(|e| {
        eprintln!("Failed to load {}: {}", AUDIO_FILE, e);
        process::exit(1);
    });

    let patterns = lumen_formats::load_patterns_file(PATTERN_FILE).unwrap_or_else(|e| {
        eprintln!("Failed to load {}: {}", PATTERN_FILE, e);
        process::exit(1);
    });

    println!(
        "Audio:    {} frames at {} Hz, {} channel(s)",
        audio.frames(),
        audio.sample_rate(),
        audio.channels()
    );
    println!(
        "Patterns: {} steps, {} ms total",
        patterns.len(),
        patterns.total_duration_ms()
    );

    let gpio = MappedGpio::map(GPIO_BASE_PI1, DEFAULT_LED_PINS).unwrap_or_else(|e| {
        eprintln!("Failed to map GPIO: {}", e);
        process::exit(1);
    });

    let sample_rate = audio.sample_rate();
    let channels = audio.channels();
    let report = Show::new(audio, patterns)
        .run(move || CpalSink::open(sample_rate, channels), gpio)
        .unwrap_or_else(|e| {
            eprintln!("Show failed: {}", e);
            process::exit(1);
        });

    if let Err(e) = write_logs(&report) {
        eprintln!("Failed to write logs: {}", e);
    }

    println!(
        "Done: {} cycles, {} underruns.",
        report.audio.len(),
        report.underruns
    );
}

fn write_logs(report: &ShowReport) -> std::io::Result<()> {
    let mut led = BufWriter::new(File::create(LED_LOG_FILE)?);
    write_led_log(&mut led, report.led.as_slice())?;

    let mut audio = BufWriter::new(File::create(AUDIO_LOG_FILE)?);
    write_audio_log(&mut audio, report.audio.as_slice(), report.underruns)?;
    Ok(())
}
