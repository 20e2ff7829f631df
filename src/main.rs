//! `regval` - read and write registry values from the command line.

#[cfg(windows)]
mod cli {
    use anyhow::{Context, Result};
    use clap::{Parser, Subcommand};
    use reg_values::prelude::*;
    use windows::Win32::System::Registry::{HKEY, HKEY_CURRENT_USER, HKEY_LOCAL_MACHINE};

    const DEMO_KEY: &str = r"Control Panel\Desktop";
    const DEMO_VALUE: &str = "PreferredUILanguagesPending";

    #[derive(Parser)]
    #[command(name = "regval", version, about = "Read and write registry values")]
    struct Cli {
        /// Operate under HKEY_LOCAL_MACHINE instead of HKEY_CURRENT_USER
        #[arg(long, global = true)]
        hklm: bool,

        #[command(subcommand)]
        command: Command,
    }

    #[derive(Subcommand)]
    enum Command {
        /// Print a REG_SZ value
        GetString { subkey: String, name: String },
        /// Print each string of a REG_MULTI_SZ value
        GetMulti { subkey: String, name: String },
        /// Print a REG_DWORD value
        GetDword { subkey: String, name: String },
        /// Write a REG_SZ value
        SetString {
            subkey: String,
            name: String,
            value: String,
        },
        /// Write a REG_MULTI_SZ value
        SetMulti {
            subkey: String,
            name: String,
            values: Vec<String>,
        },
        /// Write a REG_DWORD value
        SetDword {
            subkey: String,
            name: String,
            value: u32,
        },
        /// Delete a single value
        DeleteValue { subkey: String, name: String },
        /// Delete a key and everything below it
        DeleteTree { subkey: String },
        /// Set the pending UI language list to ja-JP and read it back
        Demo,
    }

    fn print_multi(values: &[String]) {
        for value in values {
            println!("value={value}.");
        }
    }

    pub fn run() -> Result<()> {
        let cli = Cli::parse();
        let root: HKEY = if cli.hklm {
            HKEY_LOCAL_MACHINE
        } else {
            HKEY_CURRENT_USER
        };

        match cli.command {
            Command::GetString { subkey, name } => {
                let value = get_value_string(root, &subkey, &name)
                    .with_context(|| format!("reading {subkey}\\{name}"))?;
                println!("{value}");
            }
            Command::GetMulti { subkey, name } => {
                let values = get_value_multi_string(root, &subkey, &name)
                    .with_context(|| format!("reading {subkey}\\{name}"))?;
                print_multi(&values);
            }
            Command::GetDword { subkey, name } => {
                let value = get_value_u32(root, &subkey, &name)
                    .with_context(|| format!("reading {subkey}\\{name}"))?;
                println!("{value}");
            }
            Command::SetString {
                subkey,
                name,
                value,
            } => set_key_value_string(root, &subkey, &name, &value)
                .with_context(|| format!("writing {subkey}\\{name}"))?,
            Command::SetMulti {
                subkey,
                name,
                values,
            } => set_key_value_multi_string(root, &subkey, &name, &values)
                .with_context(|| format!("writing {subkey}\\{name}"))?,
            Command::SetDword {
                subkey,
                name,
                value,
            } => set_key_value_u32(root, &subkey, &name, value)
                .with_context(|| format!("writing {subkey}\\{name}"))?,
            Command::DeleteValue { subkey, name } => delete_key_value(root, &subkey, &name)
                .with_context(|| format!("deleting {subkey}\\{name}"))?,
            Command::DeleteTree { subkey } => {
                delete_tree(root, &subkey).with_context(|| format!("deleting {subkey}"))?;
            }
            Command::Demo => {
                set_key_value_multi_string(HKEY_CURRENT_USER, DEMO_KEY, DEMO_VALUE, &["ja-JP"])
                    .context("writing the pending UI language list")?;
                let values = get_value_multi_string(HKEY_CURRENT_USER, DEMO_KEY, DEMO_VALUE)
                    .context("reading the pending UI language list")?;
                print_multi(&values);
            }
        }
        Ok(())
    }
}

#[cfg(windows)]
fn main() -> anyhow::Result<()> {
    cli::run()
}

#[cfg(not(windows))]
fn main() {
    eprintln!("regval only runs on Windows");
    std::process::exit(1);
}
