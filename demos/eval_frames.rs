use kinetype::{AnimationTimeline, Evaluator, FrameIndex};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let s = include_str!("../tests/data/kinetic_timeline.json");
    let timeline = AnimationTimeline::from_json_str(s)?;

    for f in [0u64, 49, 50, 55, 95, 144, 145] {
        let state = Evaluator::eval_frame(&timeline, FrameIndex(f));
        println!(
            "frame {f}: {:?}, {} scenes on screen",
            state.sequencer,
            state.scenes.len()
        );
    }

    Ok(())
}
