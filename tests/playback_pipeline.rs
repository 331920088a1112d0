// Integration test for the playback pipeline through the public API
// A saved project is reloaded and played against a hand-advanced stream
// clock; triggers are read off the same channel the audio callback uses

use std::time::Duration;

use ringbuf::traits::Consumer;
use steptrack::{
    create_notification_channel, create_step_channel, create_trigger_channel, Pattern,
    ProjectStore, SampleBank, SampleBuffer, SampleDispatcher, SchedulerConfig, Sequencer,
    StreamClock, Tempo, TriggerConsumer,
};
use tempfile::tempdir;

fn test_bank(instruments: usize) -> SampleBank {
    let mut bank = SampleBank::new(instruments);
    for instrument in 0..instruments {
        bank.insert(
            instrument,
            SampleBuffer {
                name: format!("Instrument {instrument}"),
                data: vec![0.5; 32],
                sample_rate: 48000,
            },
        );
    }
    bank
}

fn build_sequencer(
    pattern: Pattern,
    bpm: f64,
    clock: StreamClock,
) -> (Sequencer, TriggerConsumer) {
    let instruments = pattern.instruments();
    let (trigger_tx, trigger_rx) = create_trigger_channel(256);
    let (step_tx, _step_rx) = create_step_channel(256);
    let (notif_tx, _notif_rx) = create_notification_channel(16);
    let dispatcher = SampleDispatcher::new(
        Box::new(test_bank(instruments)),
        trigger_tx,
        step_tx,
        notif_tx,
        clock.clone(),
    );
    let sequencer = Sequencer::new(
        clock,
        dispatcher,
        SchedulerConfig::default(),
        pattern,
        Tempo::new(bpm),
    );
    (sequencer, trigger_rx)
}

#[test]
fn test_saved_project_plays_back_on_the_grid() {
    let dir = tempdir().unwrap();
    let store = ProjectStore::new(dir.path().join("projects")).unwrap();
    let project = store.create_project().unwrap();

    // Kick on every beat, saved and reloaded before playback
    let mut pattern = Pattern::new(3, 64);
    for step in (0..64).step_by(4) {
        pattern.set(0, step, true);
    }
    store.save_pattern(&project.id, &pattern, 120).unwrap();

    let (rows, bpm) = store.load_pattern(&project.id);
    let pattern = Pattern::from_saved(&rows, 3, 64);
    assert!(!pattern.is_empty());

    let clock = StreamClock::new(48000.0);
    let (mut sequencer, mut triggers) = build_sequencer(pattern, bpm as f64, clock.clone());

    sequencer.start();
    // Simulate the audio callback advancing the device clock to 1.0 s
    for _ in 0..10 {
        std::thread::sleep(Duration::from_millis(30));
        clock.advance(4800);
    }
    std::thread::sleep(Duration::from_millis(80));
    sequencer.stop();

    // Beats at 120 BPM land every 0.5 s: frames 0, 24000, 48000, ...
    let mut frames = Vec::new();
    while let Some(command) = triggers.try_pop() {
        frames.push(command.start_frame);
    }
    assert!(frames.len() >= 3);
    for (n, frame) in frames.iter().enumerate() {
        assert_eq!(*frame, n as u64 * 24000);
    }
}

#[test]
fn test_activating_a_cell_previews_immediately() {
    let clock = StreamClock::new(48000.0);
    let (sequencer, mut triggers) = build_sequencer(Pattern::new(3, 64), 120.0, clock.clone());

    clock.advance(12000); // now = 0.25 s

    // Toggling a cell on fires the sample right away, even while stopped
    assert!(sequencer.toggle_cell(1, 10));
    let preview = triggers.try_pop().unwrap();
    assert_eq!(preview.start_frame, 12000);
    assert_eq!(preview.buffer.name, "Instrument 1");

    // Toggling it back off is silent
    assert!(!sequencer.toggle_cell(1, 10));
    assert!(triggers.try_pop().is_none());
    assert!(!sequencer.pattern().get(1, 10));
}
