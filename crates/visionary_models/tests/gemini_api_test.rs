use visionary_interface::ImageGenerator;
use visionary_models::{GeminiImageConfig, GeminiImageGenerator};

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
async fn test_gemini_generates_frame_with_reference() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let generator = GeminiImageGenerator::new(GeminiImageConfig::default())?;

    let first = generator
        .generate("A small orange cat sits on a red cushion.", &[])
        .await?;
    assert!(!first.is_empty());
    assert!(first.mime().starts_with("image/"));

    let second = generator
        .generate("The cat falls asleep.", std::slice::from_ref(&first))
        .await?;
    assert!(!second.is_empty());
    println!("Generated {} and {} bytes", first.len(), second.len());

    Ok(())
}
