use logcompat::logging::LogConfig;
use logcompat::{Connection, OpenOptions};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (debug level shows metadata loads and stores)
    let _guard = LogConfig::debug().init()?;

    let dir = std::env::temp_dir().join("logcompat_demo");
    let _ = std::fs::remove_dir_all(&dir);

    println!("=== logcompat Compatibility Demo ===\n");

    println!("1. Creating database at release 3.0...");
    let conn = Connection::open(&dir, &OpenOptions::parse("compatibility=(release=\"3.0\")")?)?;
    println!("   log format {}", conn.log_version());
    conn.close()?;

    for config in [
        "compatibility=(require_max=\"2.6\")",
        "compatibility=(require_min=\"3.1\")",
        "compatibility=(release=\"3.1\")",
        "compatibility=(release=\"2.6.1\")",
    ] {
        println!("\n2. Reopening with {}", config);
        match Connection::open(&dir, &OpenOptions::parse(config)?) {
            Ok(conn) => {
                println!(
                    "   opened: release {} log format {}",
                    conn.release(),
                    conn.log_version()
                );
                conn.close()?;
            }
            Err(e) => println!("   refused: {}", e),
        }
    }

    println!("\n=== Demo Complete ===");
    std::fs::remove_dir_all(&dir)?;

    Ok(())
}
