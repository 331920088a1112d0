// Quick demonstration of the step sequencer playback loop
// Run with: cargo run --bin demo_playback

use std::path::Path;
use std::time::Duration;

use ringbuf::traits::Consumer;
use steptrack::{
    create_notification_channel, create_step_channel, create_trigger_channel, AudioOutput, Pattern,
    SampleBank, SampleDispatcher, SampleProvider, SchedulerConfig, Sequencer, Tempo,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🥁 steptrack - Playback Scheduler Demo");
    println!("======================================");

    let (trigger_tx, trigger_rx) = create_trigger_channel(256);
    let (step_tx, mut step_rx) = create_step_channel(256);
    let (notif_tx, mut notif_rx) = create_notification_channel(32);

    let output = AudioOutput::new(trigger_rx)?;
    println!("✅ Audio output running at {} Hz", output.sample_rate());

    // Load the built-in kit from ./samples (bass.wav, snare.wav, hit.wav)
    let (bank, failures) = SampleBank::load_default_kit(Path::new("samples"));
    for failure in &failures {
        println!(
            "⚠️  Could not load {} ({}): {}",
            failure.path.display(),
            bank.names()[failure.instrument],
            failure.error
        );
    }
    println!(
        "✅ Sample bank ready: {} instruments, {} loaded",
        bank.instrument_count(),
        bank.instrument_count() - failures.len()
    );

    let clock = output.clock();
    let dispatcher = SampleDispatcher::new(Box::new(bank), trigger_tx, step_tx, notif_tx, clock.clone());

    // A basic rock beat across the default 64-step grid
    let mut pattern = Pattern::default();
    for step in (0..64).step_by(8) {
        pattern.set(0, step, true); // bass on the beat
    }
    for step in (4..64).step_by(8) {
        pattern.set(1, step, true); // snare on the backbeat
    }
    for step in (0..64).step_by(2) {
        pattern.set(2, step, true); // hats on eighths
    }

    let mut sequencer = Sequencer::new(
        clock,
        dispatcher,
        SchedulerConfig::default(),
        pattern,
        Tempo::new(120.0),
    );

    println!("\n▶️  Playing two bars at 120 BPM...");
    sequencer.start();

    let mut last_step = usize::MAX;
    for _ in 0..320 {
        while let Some(boundary) = step_rx.try_pop() {
            if boundary.step != last_step && boundary.step % 8 == 0 {
                println!("   step {:2}", boundary.step);
                last_step = boundary.step;
            }
        }
        while let Some(note) = notif_rx.try_pop() {
            println!("   {}", note);
        }
        std::thread::sleep(Duration::from_millis(25));
    }

    println!("\n⏩ Doubling the tempo mid-playback (no restart)...");
    sequencer.set_bpm(240.0);
    std::thread::sleep(Duration::from_secs(4));

    sequencer.stop();
    println!("⏹  Stopped, cursor rewound to step {}", sequencer.current_step());

    println!("\n🎉 Demo complete");
    Ok(())
}
