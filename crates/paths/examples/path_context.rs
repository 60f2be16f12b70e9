//! Example demonstrating the usage of PathContext for project-aware paths.

use paths::{PathContext, RuntimeEnvironment};

fn main() {
    println!("=== PathContext Example ===\n");

    // Create a path context for your project
    let ctx = PathContext::new(
        "ecosort_labs", // Studio name
        "ecosort",      // Project ID
        "ecosort",      // The specific app (client, editor, etc.)
    );

    // Display environment info
    println!("Runtime Environment: {:?}", ctx.environment());
    println!("Base Path: {:?}", ctx.base_path());
    println!("Studio: {}", ctx.studio());
    println!("Project ID: {}", ctx.project_id());
    println!("App ID: {}\n", ctx.app_id());

    // Display project structure
    println!("=== Project Structure ===");
    println!("Project Root: {:?}", ctx.project_root());
    println!();

    // Configuration files
    println!("=== Configuration Files ===");
    println!("Settings: {:?}", ctx.settings_file(None));
    println!("Editor settings: {:?}", ctx.settings_file(Some("editor")));
    println!();

    // Directories
    println!("=== Directories ===");
    println!("Data: {:?}", ctx.data_dir());
    println!("Captures: {:?}", ctx.captures_dir());
    println!("Logs: {:?}", ctx.logs_dir());
    println!();

    // Specific paths
    println!("=== Specific Paths ===");
    println!("Capture 'cap-0001': {:?}", ctx.capture_file("cap-0001"));
    println!("Log file (now): {:?}", ctx.log_file_now());
    println!("Log file (custom): {:?}", ctx.log_file("20240315-120000"));
    println!();

    // Ensure directories exist
    match ctx.ensure_directories() {
        Ok(_) => println!("✓ All directories created successfully"),
        Err(e) => eprintln!("✗ Error creating directories: {}", e),
    }
    println!();

    // Example: Using PathContext in production vs development
    println!("=== Environment Detection ===");
    match ctx.environment() {
        RuntimeEnvironment::Development => {
            println!("Running in DEVELOPMENT mode");
            println!("→ Using project directory structure");
        }
        RuntimeEnvironment::Production => {
            println!("Running in PRODUCTION mode");
            println!("→ Using platform-specific app data directory");
        }
    }
}
