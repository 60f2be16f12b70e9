//! Integration example demonstrating PathContext usage with configuration management.
//!
//! This example shows how PathContext can be used in a real-world scenario
//! with settings, capture storage and logging.

use paths::{PathContext, RuntimeEnvironment};
use std::fs;
use std::io::Write;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== PathContext Integration Example ===\n");

    // Initialize path context for the application
    let ctx = PathContext::new(
        "ecosort_labs", // Your studio name
        "ecosort",      // Your project
        "ecosort",      // The specific app (client, editor, etc.)
    );

    // Display environment information
    println!("🔧 Environment: {:?}", ctx.environment());
    println!("📁 Base Path: {:?}\n", ctx.base_path());

    // Create all necessary directories
    println!("📂 Creating directory structure...");
    ctx.ensure_directories()?;
    println!("   ✓ Directories created\n");

    // === Settings Management ===
    println!("⚙️  Settings Management:");
    let settings_path = ctx.settings_file(None);
    println!("   Settings file: {:?}", settings_path);

    // Create a sample settings file
    let settings_content = r#"(
    general: (
        window_title: "EcoSort",
        start_signed_in: false,
    ),
    simulation: (
        analysis_delay_secs: 2.0,
        sign_in_delay_secs: 1.5,
        capture_latency_secs: 0.35,
        library_latency_secs: 0.5,
        location_latency_secs: 0.8,
        fail_captures: false,
    ),
    location: (
        region_label: "Yeoksam-dong, Gangnam-gu, Seoul",
        lat: 37.4979,
        lon: 127.0276,
    ),
)"#;

    fs::write(&settings_path, settings_content)?;
    println!("   ✓ Settings file created\n");

    // === Capture Storage ===
    println!("📷 Capture Storage:");
    let captures_dir = ctx.captures_dir();
    println!("   Captures directory: {:?}", captures_dir);

    // The simulated camera drops its fake image files here
    let capture_path = ctx.capture_file("cap-0001");
    fs::write(&capture_path, b"not really a jpeg")?;
    println!("   ✓ Capture file created\n");

    // === Logging ===
    println!("📝 Logging:");
    let log_path = ctx.log_file_now();
    println!("   Log file: {:?}", log_path);

    let mut log_file = fs::File::create(&log_path)?;
    writeln!(log_file, "[INFO] Application started")?;
    writeln!(log_file, "[INFO] Environment: {:?}", ctx.environment())?;
    writeln!(log_file, "[INFO] Settings loaded from: {:?}", settings_path)?;
    writeln!(log_file, "[INFO] All systems initialized")?;
    println!("   ✓ Log file created\n");

    // === Summary ===
    println!("📊 Summary:");
    println!("   Studio: {}", ctx.studio());
    println!("   Project: {}", ctx.project_id());
    println!("   App ID: {}", ctx.app_id());
    println!("   Project root: {:?}", ctx.project_root());
    println!();

    // List all created files
    println!("📄 Created files:");
    let created_files = vec![
        ("Settings", settings_path),
        ("Capture", capture_path),
        ("Log", log_path),
    ];

    for (name, path) in created_files {
        if path.exists() {
            let metadata = fs::metadata(&path)?;
            println!("   ✓ {} ({} bytes): {:?}", name, metadata.len(), path);
        }
    }

    println!("\n✨ Integration example completed successfully!");

    // Environment-specific advice
    println!("\n💡 Tips:");
    match ctx.environment() {
        RuntimeEnvironment::Development => {
            println!("   • Running in DEVELOPMENT mode");
            println!("   • Files are stored in project directory");
            println!("   • Perfect for testing and debugging");
        }
        RuntimeEnvironment::Production => {
            println!("   • Running in PRODUCTION mode");
            println!("   • Files are stored in platform app data directory");
            println!("   • Safe for end-user installations");
        }
    }

    Ok(())
}
