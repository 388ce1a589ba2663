use std::sync::Arc;

use kinetype::{
    GenerationPipeline, GenerationRequest, InMemoryProjectRepository, ProviderSet,
    RenderOverrides,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let request: GenerationRequest =
        serde_json::from_str(include_str!("../tests/data/generation_request.json"))?;
    let project_id = request.project_id.clone();

    let pipeline =
        GenerationPipeline::new(ProviderSet::mock(), Arc::new(InMemoryProjectRepository::new()));
    let output = pipeline.run(request).await?;
    println!(
        "{}: {} scenes, {} frames, emphasis {:?}",
        output.project_id,
        output.timeline.scenes.len(),
        output.timeline.total_frames(),
        output.script_result.emphasized_words
    );

    let receipt = pipeline
        .submit_render(&project_id, RenderOverrides::default())
        .await?;
    println!("render {} -> {}", receipt.render_id, receipt.output_url);
    Ok(())
}
