mod app;

use anyhow::Result;
use ratex_core::{ScaleDescriptor, TrialConfig};
use ratex_render::{SkiaSurface, load_system_font};
use ratex_sim::{SimulationOptions, Simulator};
use ratex_trial::ControllerOptions;

fn demo_config(image: &str) -> TrialConfig {
    TrialConfig {
        stimulus_image: image.into(),
        stimulus_word: "serene".into(),
        image_preamble: Some("Please rate the pair below.".into()),
        leftmost_label: "Not at all".into(),
        rightmost_label: "Very much".into(),
        questions: vec![
            ScaleDescriptor {
                name: "fit".into(),
                ..ScaleDescriptor::new("How well does the word fit the image?", 0, 100)
            },
            ScaleDescriptor {
                name: "confidence".into(),
                ..ScaleDescriptor::new("How confident are you?", 0, 10)
            },
        ],
        ..TrialConfig::default()
    }
}

fn run_data_only(config: &TrialConfig) -> Result<()> {
    let mut simulator = Simulator::new(rand::rng())?;
    let record = simulator.simulate_data_only(config, &SimulationOptions::default())?;
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

fn run_visual_sim(config: &TrialConfig) -> Result<()> {
    let mut surface = SkiaSurface::render(config, 1280, 800, load_system_font())?;
    let mut simulator = Simulator::new(rand::rng())?;
    let options = ControllerOptions {
        echo_record: false,
        ..ControllerOptions::default()
    };
    let record =
        simulator.simulate_visual(config, &SimulationOptions::default(), options, &mut surface)?;
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let image = args
        .iter()
        .find(|a| !a.starts_with("--"))
        .cloned()
        .unwrap_or_else(|| "placeholder.png".to_string());
    let config = demo_config(&image);

    if args.iter().any(|a| a == "--simulate") {
        return run_data_only(&config);
    }
    if args.iter().any(|a| a == "--simulate-visual") {
        return run_visual_sim(&config);
    }

    app::App::new(config)?.run()
}
