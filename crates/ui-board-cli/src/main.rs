//! ui_to_usb Board Control Tool
//!
//! CLI for exercising the ui_to_usb board: OLED, LEDs, buttons, and
//! rotary encoder.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use ui_board_hw::{find_boards, Framebuffer, UiBoard};

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum Switch {
    On,
    Off,
}

#[derive(Parser)]
#[command(name = "uiboardctl")]
#[command(about = "Control tool for the ui_to_usb board")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List connected boards
    List,
    /// Show the firmware version
    Version,
    /// Reinitialize the board
    Reset,
    /// Set LED colors (3-bit BGR, 0-7)
    Led {
        /// Color for LED A (omit to leave unchanged)
        #[arg(long)]
        a: Option<u8>,

        /// Color for LED B (omit to leave unchanged)
        #[arg(long)]
        b: Option<u8>,
    },
    /// Set OLED brightness
    Brightness {
        /// Brightness level (0 = off, 1-16 = on)
        level: u16,
    },
    /// Invert the display
    Invert {
        /// on or off
        state: Switch,
    },
    /// Clear the display to a solid grey level
    Clear {
        /// Grey level (0-255)
        #[arg(long, default_value = "0")]
        level: u8,
    },
    /// Show a greyscale test pattern
    Pattern,
    /// Poll and print input events
    Watch {
        /// Poll interval in milliseconds
        #[arg(long, default_value = "50")]
        interval: u64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Commands::List = cli.command {
        return handle_list();
    }

    let mut board = UiBoard::open_first().context(
        "Failed to open a ui_to_usb board. Is it plugged in, and do you have USB permissions?",
    )?;

    match cli.command {
        Commands::List => unreachable!(),
        Commands::Version => {
            let version = board.firmware_version()?;
            println!("Firmware version: {}", version);
        }
        Commands::Reset => {
            board.reset()?;
            println!("Board reset");
        }
        Commands::Led { a, b } => {
            if a.is_none() && b.is_none() {
                anyhow::bail!("Specify at least one of --a or --b");
            }
            board.set_led(a, b)?;
            println!("LED state set to {:#04X}", board.led_state());
        }
        Commands::Brightness { level } => {
            board.set_brightness(level)?;
            println!("Brightness set to: {}", level);
        }
        Commands::Invert { state } => {
            board.set_inverted(matches!(state, Switch::On))?;
            println!(
                "Display inversion: {}",
                if matches!(state, Switch::On) {
                    "on"
                } else {
                    "off"
                }
            );
        }
        Commands::Clear { level } => {
            let mut fb = Framebuffer::new();
            fb.clear(level);
            board.send_frame(&fb)?;
            println!("Display cleared to level: {}", level);
        }
        Commands::Pattern => {
            board.send_frame(&test_pattern())?;
            println!("Test pattern sent");
        }
        Commands::Watch { interval } => {
            handle_watch(&mut board, Duration::from_millis(interval))?;
        }
    }

    Ok(())
}

fn handle_list() -> Result<()> {
    let boards = find_boards().context("Failed to scan the USB bus")?;
    if boards.is_empty() {
        println!("No ui_to_usb boards found");
    } else {
        for board in &boards {
            println!("Board at bus {:03} addr {:03}", board.bus_number(), board.address());
        }
    }
    Ok(())
}

/// Horizontal gradient with a bright border, covers every grey level.
fn test_pattern() -> Framebuffer {
    let mut fb = Framebuffer::new();
    for y in 0..fb.height() {
        for x in 0..fb.width() {
            fb.set_pixel(x, y, x as u8);
        }
    }
    fb.fill_rect(0, 0, fb.width(), 1, 0xFF);
    fb.fill_rect(0, fb.height() - 1, fb.width(), 1, 0xFF);
    fb.fill_rect(0, 0, 1, fb.height(), 0xFF);
    fb.fill_rect(fb.width() - 1, 0, 1, fb.height(), 0xFF);
    fb
}

fn handle_watch(board: &mut UiBoard, interval: Duration) -> Result<()> {
    println!("Polling inputs every {:?} (Ctrl-C to stop)", interval);
    loop {
        let event = board.poll_inputs()?;
        if !event.is_idle() {
            let mut flags = Vec::new();
            if event.button0_pressed() {
                flags.push("BTN0");
            }
            if event.button1_pressed() {
                flags.push("BTN1");
            }
            if event.button0_short_press() {
                flags.push("BTN0_SHORT");
            }
            if event.button1_short_press() {
                flags.push("BTN1_SHORT");
            }
            if event.button0_long_press() {
                flags.push("BTN0_LONG");
            }
            if event.button1_long_press() {
                flags.push("BTN1_LONG");
            }
            println!(
                "flags={:#04X} [{}] encoder_delta={}",
                event.button_flags,
                flags.join(" "),
                event.encoder_delta
            );
        }
        std::thread::sleep(interval);
    }
}
