/// Print the loaded navigation configuration
///
/// Run with: cargo run -p rune-config --example print_config

fn main() {
    let config = rune_config::RuneConfig::load();

    println!("=== Rune Navigation Configuration ===\n");

    println!("Navigation:");
    println!("  Skip Animations: {}", config.navigation.skip_animations);
    println!("  Document: {:?}", config.navigation.document);
    println!();

    for (name, timing) in [
        ("Show", &config.transitions.show),
        ("Hide", &config.transitions.hide),
    ] {
        println!("{name} Transition:");
        println!("  Duration: {} ms", timing.duration_ms);
        println!("  Delay: {} ms", timing.delay_ms);
        println!("  Easing: {}", timing.easing);
        println!();
    }

    println!("Logging:");
    println!("  Filter: {}", config.logging.filter);
    println!();

    match toml::to_string_pretty(&config) {
        Ok(toml_str) => {
            println!("=== Serialized Configuration ===");
            println!("{}", toml_str);
        }
        Err(e) => {
            eprintln!("Failed to serialize config: {}", e);
        }
    }
}
