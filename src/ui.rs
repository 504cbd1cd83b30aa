// UI layer: the interactive invitation flow built on `dialoguer`.
// Prompts run in sequence, invalid input is re-asked locally, and all
// status output goes through a `StatusSink` so the flow itself stays
// free of terminal-color concerns.

use crate::api::{InviteClient, InviteOutcome, InviteRequest, DEFAULT_ENDPOINT};
use crate::input::{is_valid_email, normalize_code};
use crate::output::{StatusSink, Tone};
use anyhow::Result;
use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Set when the process receives Ctrl-C outside a prompt. Prompts run
/// the terminal in raw mode where Ctrl-C surfaces as an `Interrupted`
/// read instead; this flag covers the blocking send, where the signal
/// is delivered normally.
static INTERRUPTED: AtomicBool = AtomicBool::new(false);

/// Entry point for the process signal handler.
pub fn flag_interrupt() {
    INTERRUPTED.store(true, Ordering::SeqCst);
}

/// Run the interactive session: prompt, confirm, send, report, and ask
/// whether to go again. Loops (not recursion) until the operator is
/// done or declines the confirmation.
pub fn run(sink: &dyn StatusSink) -> Result<()> {
    sink.header("Team Invitation Tool");
    sink.blank();
    sink.line(
        Tone::Plain,
        "Welcome! This tool sends group-subscription invitations through the invite API.",
    );
    sink.blank();

    loop {
        let endpoint = prompt_endpoint(sink)?;
        sink.blank();
        let code = prompt_code(sink)?;
        sink.blank();
        let email = prompt_email(sink)?;

        sink.header("Please confirm");
        sink.line(Tone::Plain, &format!("Endpoint: {}", endpoint));
        sink.line(Tone::Plain, &format!("Code:     {}", code));
        sink.line(Tone::Plain, &format!("Email:    {}", email));
        sink.blank();

        let answer: String = Input::new()
            .with_prompt("Send the invitation? (y/n)")
            .allow_empty(true)
            .interact_text()?;
        if !affirmed(&answer) {
            sink.line(Tone::Warning, "Cancelled");
            return Ok(());
        }

        sink.header("Sending invitation");
        let client = InviteClient::new(endpoint)?;
        let request = InviteRequest {
            card_key: code,
            email,
        };
        sink.line(Tone::Info, "Connecting to the server...");
        let (status, outcome) = send_with_spinner(&client, &request)?;
        let success = present_outcome(sink, &client, status, &outcome);

        sink.blank();
        if success {
            sink.header("Done");
            sink.line(Tone::Success, "The invitation was sent!");
            sink.line(Tone::Info, "Check the inbox for the invitation email");
        } else {
            sink.header("Failed");
            sink.line(
                Tone::Error,
                "The invitation was not sent; see the messages above",
            );
        }
        sink.blank();

        let again: String = Input::new()
            .with_prompt("Send another invitation? (y/n)")
            .allow_empty(true)
            .interact_text()?;
        if !affirmed(&again) {
            sink.line(Tone::Info, "Thanks for using the tool, goodbye!");
            return Ok(());
        }
        sink.blank();
    }
}

/// Ask for the API endpoint; a blank answer selects the default.
fn prompt_endpoint(sink: &dyn StatusSink) -> Result<String> {
    sink.line(Tone::Info, "Enter the API endpoint");
    sink.line(
        Tone::Plain,
        &format!("Press Enter to use the default: {}", DEFAULT_ENDPOINT),
    );
    let input: String = Input::new()
        .with_prompt("Endpoint")
        .allow_empty(true)
        .interact_text()?;
    let trimmed = input.trim();
    if trimmed.is_empty() {
        sink.line(
            Tone::Info,
            &format!("Using the default endpoint: {}", DEFAULT_ENDPOINT),
        );
        Ok(DEFAULT_ENDPOINT.to_string())
    } else {
        Ok(trimmed.to_string())
    }
}

/// Ask for the redemption code, re-prompting on empty input, and echo
/// the normalized form so the operator sees what will be sent.
fn prompt_code(sink: &dyn StatusSink) -> Result<String> {
    loop {
        sink.line(Tone::Info, "Enter the redemption code");
        sink.line(Tone::Plain, "Format: XXXX-XXXX-XXXX or XXXXXXXXXXXX");
        let raw: String = Input::new()
            .with_prompt("Code")
            .allow_empty(true)
            .interact_text()?;
        if raw.trim().is_empty() {
            sink.line(Tone::Error, "The code must not be empty");
            continue;
        }
        let code = normalize_code(&raw);
        sink.line(Tone::Info, &format!("Code normalized to: {}", code));
        return Ok(code);
    }
}

/// Ask for the email address, re-prompting until it passes validation.
fn prompt_email(sink: &dyn StatusSink) -> Result<String> {
    loop {
        sink.line(Tone::Info, "Enter the email address to invite");
        let email: String = Input::new()
            .with_prompt("Email")
            .allow_empty(true)
            .interact_text()?;
        let email = email.trim().to_string();
        if email.is_empty() {
            sink.line(Tone::Error, "The email address must not be empty");
            continue;
        }
        if !is_valid_email(&email) {
            sink.line(Tone::Error, "That does not look like an email address");
            sink.line(
                Tone::Warning,
                "Enter a valid address, for example: user@example.com",
            );
            continue;
        }
        sink.line(Tone::Success, &format!("Email looks good: {}", email));
        return Ok(email);
    }
}

/// `y`, `yes` and `是` count as affirmative; everything else declines.
fn affirmed(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes" | "是")
}

/// Run the blocking send on a worker thread while a spinner keeps the
/// terminal alive, watching the interrupt flag so Ctrl-C abandons the
/// request instead of waiting out the 30-second timeout.
fn send_with_spinner(
    client: &InviteClient,
    request: &InviteRequest,
) -> io::Result<(Option<u16>, InviteOutcome)> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}").unwrap());
    spinner.set_message("Sending invitation...");
    spinner.enable_steady_tick(Duration::from_millis(80));

    let worker_client = client.clone();
    let worker_request = request.clone();
    let handle = thread::spawn(move || worker_client.send_invite_with_status(&worker_request));
    let result = wait_for_send(&INTERRUPTED, handle);

    spinner.finish_and_clear();
    result
}

/// Poll the send thread until it finishes or an interrupt is flagged.
/// An interrupt surfaces as an `Interrupted` io::Error, the same shape
/// Ctrl-C takes at a prompt, so the top level handles both alike.
fn wait_for_send<T>(interrupted: &AtomicBool, handle: JoinHandle<T>) -> io::Result<T> {
    loop {
        if handle.is_finished() {
            return handle
                .join()
                .map_err(|_| io::Error::new(io::ErrorKind::Other, "send thread panicked"));
        }
        if interrupted.load(Ordering::SeqCst) {
            return Err(io::Error::new(
                io::ErrorKind::Interrupted,
                "interrupted while waiting for the server",
            ));
        }
        thread::sleep(Duration::from_millis(50));
    }
}

/// Print the per-variant report and return the overall success flag.
/// The raw HTTP status, when a response came back at all, is echoed
/// first so the operator always sees what the server answered.
fn present_outcome(
    sink: &dyn StatusSink,
    client: &InviteClient,
    status: Option<u16>,
    outcome: &InviteOutcome,
) -> bool {
    if let Some(code) = status {
        sink.line(Tone::Info, &format!("HTTP status: {}", code));
    }
    match outcome {
        InviteOutcome::Success { message } => {
            sink.line(Tone::Success, "Invitation sent!");
            sink.line(Tone::Info, message);
            true
        }
        InviteOutcome::ClientError { message } => {
            sink.line(Tone::Error, "The server rejected the request");
            sink.line(Tone::Error, &format!("Error: {}", message));
            sink.blank();
            sink.line(Tone::Warning, "Possible causes:");
            sink.line(Tone::Plain, "  • the code format is wrong");
            sink.line(Tone::Plain, "  • the code has already been used");
            sink.line(Tone::Plain, "  • the email address is malformed");
            sink.line(Tone::Plain, "  • no seats are available");
            false
        }
        InviteOutcome::NotFound => {
            sink.line(Tone::Error, "The API endpoint does not exist");
            sink.line(
                Tone::Warning,
                &format!("Check that the endpoint is correct: {}", client.endpoint()),
            );
            false
        }
        InviteOutcome::ServerError => {
            sink.line(Tone::Error, "Internal server error");
            sink.line(Tone::Warning, "Ask the administrator to check the server");
            false
        }
        InviteOutcome::UnknownStatus { status, message } => {
            sink.line(Tone::Error, &format!("Unknown error (HTTP {})", status));
            sink.line(Tone::Error, &format!("Error: {}", message));
            false
        }
        InviteOutcome::ConnectionFailure => {
            sink.line(Tone::Error, "Could not connect to the server");
            sink.blank();
            sink.line(Tone::Warning, "Possible causes:");
            sink.line(Tone::Plain, "  • the endpoint address is wrong");
            sink.line(Tone::Plain, "  • the server is not running");
            sink.line(Tone::Plain, "  • a network problem");
            sink.blank();
            sink.line(
                Tone::Plain,
                &format!("Endpoint in use: {}", client.endpoint()),
            );
            false
        }
        InviteOutcome::Timeout => {
            sink.line(Tone::Error, "The request timed out");
            sink.line(
                Tone::Warning,
                "The server took more than 30 seconds to respond",
            );
            false
        }
        InviteOutcome::UnexpectedFailure { detail } => {
            sink.line(Tone::Error, &format!("Unexpected failure: {}", detail));
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::recording::RecordingSink;

    fn client() -> InviteClient {
        InviteClient::new("http://127.0.0.1:1/api/invite").unwrap()
    }

    #[test]
    fn affirmative_answers() {
        assert!(affirmed("y"));
        assert!(affirmed("Y"));
        assert!(affirmed("yes"));
        assert!(affirmed(" YES "));
        assert!(affirmed("是"));
        assert!(!affirmed("n"));
        assert!(!affirmed(""));
        assert!(!affirmed("maybe"));
    }

    #[test]
    fn success_outcome_reports_success() {
        let sink = RecordingSink::default();
        let outcome = InviteOutcome::Success {
            message: "ok".to_string(),
        };
        assert!(present_outcome(&sink, &client(), None, &outcome));
        let lines = sink.lines.borrow();
        assert_eq!(lines[0], (Tone::Success, "Invitation sent!".to_string()));
        assert_eq!(lines[1], (Tone::Info, "ok".to_string()));
    }

    #[test]
    fn http_status_is_echoed_before_the_report() {
        let sink = RecordingSink::default();
        let outcome = InviteOutcome::ClientError {
            message: "code used".to_string(),
        };
        assert!(!present_outcome(&sink, &client(), Some(400), &outcome));
        let lines = sink.lines.borrow();
        assert_eq!(lines[0], (Tone::Info, "HTTP status: 400".to_string()));
    }

    #[test]
    fn transport_failures_echo_no_status() {
        let sink = RecordingSink::default();
        present_outcome(&sink, &client(), None, &InviteOutcome::Timeout);
        let lines = sink.lines.borrow();
        assert!(!lines.iter().any(|(_, text)| text.contains("HTTP status")));
    }

    #[test]
    fn client_error_lists_possible_causes() {
        let sink = RecordingSink::default();
        let outcome = InviteOutcome::ClientError {
            message: "code used".to_string(),
        };
        assert!(!present_outcome(&sink, &client(), None, &outcome));
        let lines = sink.lines.borrow();
        assert!(lines
            .iter()
            .any(|(tone, text)| *tone == Tone::Error && text.contains("code used")));
        assert!(lines
            .iter()
            .any(|(_, text)| text.contains("already been used")));
    }

    #[test]
    fn connection_failure_names_the_endpoint() {
        let sink = RecordingSink::default();
        assert!(!present_outcome(
            &sink,
            &client(),
            None,
            &InviteOutcome::ConnectionFailure
        ));
        let lines = sink.lines.borrow();
        assert!(lines
            .iter()
            .any(|(_, text)| text.contains("http://127.0.0.1:1/api/invite")));
    }

    #[test]
    fn unknown_status_includes_the_code() {
        let sink = RecordingSink::default();
        let outcome = InviteOutcome::UnknownStatus {
            status: 418,
            message: "teapot".to_string(),
        };
        assert!(!present_outcome(&sink, &client(), Some(418), &outcome));
        let lines = sink.lines.borrow();
        assert!(lines.iter().any(|(_, text)| text.contains("HTTP 418")));
    }

    #[test]
    fn interrupt_while_waiting_surfaces_as_interrupted() {
        let interrupted = AtomicBool::new(false);
        let handle = thread::spawn(|| {
            thread::sleep(Duration::from_secs(2));
            0u8
        });
        interrupted.store(true, Ordering::SeqCst);
        let err = wait_for_send(&interrupted, handle).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Interrupted);
    }

    #[test]
    fn finished_send_is_returned_untouched() {
        let interrupted = AtomicBool::new(false);
        let handle = thread::spawn(|| 7u8);
        assert_eq!(wait_for_send(&interrupted, handle).unwrap(), 7);
    }
}
