//! Drive a split timer end to end: config file, console input, redraw loop, save

use nyacore_splits::{
    AppState, Command, ConfigFile, KeyValueConfig, ManualClock, RenderView, SplitTimer,
    SplitsError,
};
use std::fs;
use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

fn write_config(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("alttp.toml");
    fs::write(
        &path,
        r#"
        [general]
        use_console = true
        render_wait = 5
        record_file = "records.toml"

        [split.eastern]
        name = "Eastern Palace"
        image = "dungeons.png"
        short = "ep"

        [split.desert]
        name = "Desert Palace"
        image = "dungeons.png"
        short = "dp"

        [split.hera]
        name = "Tower of Hera"
        short = ["toh", "hera"]
        "#,
    )
    .unwrap();
    path
}

#[test]
fn test_console_session_saves_records() {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = tempfile::tempdir().unwrap();
    let config_path = write_config(dir.path());

    let mut timer = SplitTimer::from_file(&config_path).unwrap();
    assert!(timer.settings().use_console);
    assert_eq!(timer.record_path(), Some(dir.path().join("records.toml").as_path()));

    let input = "start\nDesert Palace\nhera\nganon\nstop\nsave\nquit\nreset\n";
    timer.start_console(Cursor::new(input)).unwrap();

    let mut frames: Vec<RenderView> = Vec::new();
    timer.run(&mut |view: &RenderView| frames.push(view.clone()));

    assert_eq!(timer.state(), AppState::Terminating);
    assert!(!frames.is_empty());

    let order: Vec<&str> = timer.collection().iter().map(|s| s.id.as_str()).collect();
    assert_eq!(order, vec!["hera", "desert", "eastern"]);
    assert!(!timer.collection().running());

    // Eastern and Desert were each stopped by an activation
    let saved = fs::read_to_string(dir.path().join("records.toml")).unwrap();
    let flat = KeyValueConfig::from_toml_str(&saved).unwrap();
    assert_eq!(flat.get("split.eastern.attempts"), Some("1"));
    assert_eq!(flat.get("split.desert.attempts"), Some("1"));
    assert_eq!(flat.get("split.hera.attempts"), Some("0"));

    // Second finish is a no-op
    timer.finish();
}

#[test]
fn test_saved_records_seed_next_load() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = write_config(dir.path());
    fs::write(
        dir.path().join("records.toml"),
        "[split.desert]\nbest = \"00:02:10.50\"\naverage = \"00:02:30.00\"\nattempts = 4\n",
    )
    .unwrap();

    let timer = SplitTimer::from_file(&config_path).unwrap();
    let desert = timer.collection().get(1).unwrap();

    assert_eq!(desert.id, "desert");
    assert_eq!(desert.records.best, Duration::from_millis(130_500));
    assert_eq!(desert.records.attempts, 4);

    let view = timer.collection().view();
    assert_eq!(view.total_best, "00:02:10.50");
    assert_eq!(view.total_average, "00:02:30.00");
}

#[test]
fn test_bad_record_value_aborts_load() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = write_config(dir.path());
    fs::write(dir.path().join("records.toml"), "[split.hera]\nbest = \"fast\"\n").unwrap();

    match SplitTimer::from_file(&config_path) {
        Err(SplitsError::ConfigParse { key, value, .. }) => {
            assert_eq!(key, "split.hera.best");
            assert_eq!(value, "fast");
        }
        Err(other) => panic!("unexpected error: {}", other),
        Ok(_) => panic!("load should fail"),
    }
}

#[test]
fn test_activation_records_elapsed_time() {
    let clock = ManualClock::new();
    let config = ConfigFile::from_toml_str(
        r#"
        [split.a]
        name = "A"
        [split.b]
        name = "B"
        [split.c]
        name = "C"
        "#,
    )
    .unwrap();
    let mut timer = SplitTimer::new(config, Arc::new(clock.clone())).unwrap();

    timer.apply(Command::Start).unwrap();
    clock.advance(Duration::from_millis(500));
    timer.apply(Command::Activate("C".into())).unwrap();
    clock.advance(Duration::from_millis(250));

    let collection = timer.collection();
    let ids: Vec<&str> = collection.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["c", "a", "b"]);

    let a = collection.get(1).unwrap();
    assert_eq!(a.timer.current(), Duration::from_millis(500));
    assert_eq!(a.records.best, Duration::from_millis(500));
    assert_eq!(a.records.attempts, 1);
    assert_eq!(collection.total_current(), Duration::from_millis(750));

    // Already active: nothing moves, nothing is recorded
    timer.apply(Command::Activate("C".into())).unwrap();
    assert_eq!(timer.collection().get(0).unwrap().records.attempts, 0);
    assert_eq!(timer.collection().total_current(), Duration::from_millis(750));
}

#[test]
fn test_external_shutdown_does_not_hang_on_blocked_console() {
    let clock = ManualClock::new();
    let config = ConfigFile::from_toml_str("[split.a]\nname = \"A\"\n").unwrap();
    let mut timer = SplitTimer::new(config, Arc::new(clock)).unwrap();

    // A reader that never yields a line
    let (_keep_open, reader) = blocking_reader();
    timer.start_console(reader).unwrap();

    let signal = timer.shutdown_signal();
    let waker = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(20));
        signal.trigger();
    });

    timer.run(&mut |_: &RenderView| {});
    waker.join().unwrap();
    assert_eq!(timer.state(), AppState::Terminating);
}

/// Reader whose `read` blocks until the returned sender is dropped
fn blocking_reader() -> (
    crossbeam_channel::Sender<Vec<u8>>,
    std::io::BufReader<ChannelReader>,
) {
    let (tx, rx) = crossbeam_channel::unbounded();
    (tx, std::io::BufReader::new(ChannelReader { rx }))
}

struct ChannelReader {
    rx: crossbeam_channel::Receiver<Vec<u8>>,
}

impl std::io::Read for ChannelReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self.rx.recv() {
            Ok(bytes) => {
                let n = bytes.len().min(buf.len());
                buf[..n].copy_from_slice(&bytes[..n]);
                Ok(n)
            }
            Err(_) => Ok(0),
        }
    }
}
