use alloy_primitives::Address;
use eyre::{eyre, Result};
use std::io::{self, Write};
use std::process::{Command, Stdio};
use std::str::FromStr;

/// Execute a command with real-time output streaming, failing on a non-zero exit status
pub fn run_command(mut cmd: Command) -> Result<()> {
    cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit());
    let status = cmd.status()?;

    if status.success() {
        Ok(())
    } else {
        Err(eyre!("Command {:?} failed with status: {}", cmd.get_program(), status))
    }
}

/// Async counterpart of [`run_command`], for commands that run alongside other work
pub async fn run_command_async(mut cmd: tokio::process::Command) -> Result<()> {
    cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit());
    let status = cmd.status().await?;

    if status.success() {
        Ok(())
    } else {
        Err(eyre!(
            "Command {:?} failed with status: {}",
            cmd.as_std().get_program(),
            status
        ))
    }
}

/// General function to prompt for input with a specific message
pub fn prompt_for_input(prompt: &str) -> io::Result<String> {
    print!("{}: ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(input.trim().to_string())
}

/// Prompt the user for a yes/no answer, defaulting to "no"
pub fn prompt_for_confirmation(prompt: &str) -> Result<bool> {
    loop {
        let input = prompt_for_input(&format!("{prompt} [y/N]"))?;
        match parse_confirmation(&input) {
            Some(answer) => return Ok(answer),
            None => println!("Please answer `y` or `n`."),
        }
    }
}

/// Interpret a confirmation answer, `None` if the answer is not recognized
fn parse_confirmation(input: &str) -> Option<bool> {
    match input.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "" | "n" | "no" => Some(false),
        _ => None,
    }
}

/// Function to prompt user for a valid Ethereum address
pub fn prompt_for_eth_address(prompt: &str) -> Result<String> {
    loop {
        let input = prompt_for_input(prompt)?;

        if is_valid_eth_address_format(&input) {
            return Ok(input);
        } else {
            println!("Invalid Ethereum address format. Please enter 40 hex characters, optionally prefixed with 0x.");
        }
    }
}

/// Whether the input parses as an address: 40 hex characters, with or
/// without a `0x` prefix. Checksums are not enforced.
pub fn is_valid_eth_address_format(address: &str) -> bool {
    Address::from_str(address).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_confirmation() {
        assert_eq!(parse_confirmation("y"), Some(true));
        assert_eq!(parse_confirmation(" YES "), Some(true));
        assert_eq!(parse_confirmation(""), Some(false));
        assert_eq!(parse_confirmation("no"), Some(false));
        assert_eq!(parse_confirmation("maybe"), None);
    }

    #[test]
    fn test_address_format() {
        assert!(is_valid_eth_address_format(
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        ));
        assert!(is_valid_eth_address_format(
            "f39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        ));
        assert!(!is_valid_eth_address_format("0xf39fd6e51aad88"));
        assert!(!is_valid_eth_address_format("not an address"));
    }

    #[test]
    fn test_run_command_failure() {
        let cmd = Command::new("false");
        assert!(run_command(cmd).is_err());
    }

    #[tokio::test]
    async fn test_run_command_async_success() {
        let cmd = tokio::process::Command::new("true");
        assert!(run_command_async(cmd).await.is_ok());
    }
}
