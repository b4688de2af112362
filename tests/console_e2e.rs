// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// CONSOLE END-TO-END TESTS
//
// Scripted operator sessions against an in-memory ledger: parsing, routing,
// validation order, confirmation and submission.
//
// Usage:
//   cargo test --test console_e2e
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

mod common;

use common::*;
use dbw_cli::editor::{EditMode, ReadOutcome};
use dbw_cli::{Console, ConsoleError, Flow, Output, PromptLock, CONFIRM_PROMPT};
use dbw_core::{ArgValue, LedgerClient, NATIVE_CONTRACT_ID};
use std::io::{self, Write};
use std::sync::atomic::Ordering;
use std::sync::Arc;

fn scripted(lines: &[&str]) -> (Arc<ScriptedEditor>, Harness) {
    let editor = Arc::new(ScriptedEditor::lines(lines));
    let h = harness(editor.clone());
    (editor, h)
}

// ─────────────────────────────────────────────────────────────────
// TRANSFER
// ─────────────────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_transfer_confirmed_prints_parsed_amount_and_txid() {
    let transfer = format!("transfer USDT {} 10.5", RECIPIENT);
    let (editor, h) = scripted(&["balance", &transfer, "y"]);

    h.console.run().await.unwrap();

    let out = h.out.text();
    assert!(out.contains("10.500000 USDT"), "output was:\n{}", out);
    assert!(out.contains(&format!("Transfer 10.500000 USDT to {}", RECIPIENT)));
    assert!(out.contains(&format!("Transaction submitted: txid = {}", TXID)));

    assert_eq!(
        h.ledger.submissions(),
        vec![Submission::Transfer {
            asset: USDT_SCID.to_string(),
            recipient: RECIPIENT.to_string(),
            amount: 10_500_000,
        }]
    );

    // balance, transfer, the confirmation answer, then end of input
    let prompts = editor.prompts_at_read();
    assert_eq!(prompts.len(), 4);
    assert_eq!(prompts[2], CONFIRM_PROMPT);
    assert_ne!(prompts[3], CONFIRM_PROMPT);
}

#[tokio::test]
async fn test_transfer_token_symbol_is_case_insensitive() {
    let transfer = format!("transfer usdt {} 1", RECIPIENT);
    let (_editor, h) = scripted(&["Y"]);
    h.console.eval("balance").await;
    assert_eq!(h.console.eval(&transfer).await, Flow::Continue);

    assert!(h.out.text().contains("Transfer 1.000000 USDT"));
    assert_eq!(h.ledger.submissions().len(), 1);
}

#[tokio::test]
async fn test_transfer_refused_is_cancelled() {
    let transfer = format!("transfer USDT {} 2", RECIPIENT);
    for answer in ["n", "", "No", "ok"] {
        let (_editor, h) = scripted(&[answer]);
        h.console.eval("balance").await;
        h.console.eval(&transfer).await;
        assert!(h.out.text().contains("Cancelled."), "answer {:?}", answer);
        assert!(h.ledger.submissions().is_empty(), "answer {:?}", answer);
    }
}

#[tokio::test]
async fn test_transfer_interrupted_confirmation_is_cancelled() {
    let editor = Arc::new(ScriptedEditor::outcomes(vec![ReadOutcome::Interrupted(
        "y".into(),
    )]));
    let h = harness(editor);
    h.console.eval("balance").await;
    h.console
        .eval(&format!("transfer USDT {} 2", RECIPIENT))
        .await;
    assert!(h.out.text().contains("Cancelled."));
    assert!(h.ledger.submissions().is_empty());
}

#[tokio::test]
async fn test_unparsable_amount_never_reaches_confirmation() {
    for amount in ["abc", "1.2345678", "-1", "1e3", "1.2.3", "99999999999999999999"] {
        let (editor, h) = scripted(&["y"]);
        h.console.eval("balance").await;
        h.console
            .eval(&format!("transfer USDT {} {}", RECIPIENT, amount))
            .await;

        assert!(
            h.err.text().contains(&format!("Cannot parse amount '{}'", amount)),
            "amount {:?}",
            amount
        );
        assert!(h.ledger.submissions().is_empty());
        assert_eq!(editor.remaining(), 1, "confirmation was solicited for {:?}", amount);
    }
}

#[tokio::test]
async fn test_transfer_validation_errors() {
    let (editor, h) = scripted(&["y"]);
    h.console.eval("balance").await;

    h.console.eval(&format!("transfer BTC {} 1", RECIPIENT)).await;
    h.console.eval("transfer USDT 0xnotadero 1").await;
    h.console.eval("transfer USDT 1").await;

    let err = h.err.text();
    assert!(err.contains("Token 'BTC' not found."));
    assert!(err.contains("Cannot parse wallet address '0xnotadero'"));
    assert!(err.contains("Transfer requires 3 arguments"));
    assert!(h.ledger.submissions().is_empty());
    assert_eq!(editor.remaining(), 1);
}

#[tokio::test]
async fn test_rejected_submission_reports_failure() {
    let (_editor, h) = scripted(&["y"]);
    h.ledger.reject_submissions.store(true, Ordering::SeqCst);
    h.console.eval("balance").await;
    h.console.eval(&format!("transfer DERO {} 0.5", RECIPIENT)).await;

    assert!(h.out.text().contains("Transfer 0.50000 DERO"));
    assert!(h.err.text().contains("Transaction failed."));
    assert!(!h.out.text().contains("Transaction submitted"));
}

// ─────────────────────────────────────────────────────────────────
// BRIDGE
// ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_bridge_native_rejected_before_anything_else() {
    for line in ["bridge DERO addr 5", "bridge dero 0xzz not-a-number", "bridge Dero x 1.123456789"] {
        let (editor, h) = scripted(&["y"]);
        h.console.eval("balance").await;
        h.console.eval(line).await;

        let err = h.err.text();
        assert!(err.contains("Cannot bridge DERO"), "line {:?}", line);
        assert!(!err.contains("Cannot parse"), "line {:?}", line);
        assert!(h.ledger.submissions().is_empty());
        assert_eq!(editor.remaining(), 1, "confirmation was solicited for {:?}", line);
    }
}

#[tokio::test]
async fn test_bridge_submits_amount_fee_and_eth_address() {
    let (_editor, h) = scripted(&["y"]);
    h.console.eval("balance").await;
    h.console
        .eval(&format!("bridge USDT {} 3.25", ETH_ADDRESS))
        .await;

    let out = h.out.text();
    assert!(out.contains(&format!(
        "Transfer 3.250000 USDT to Ethereum address {}",
        ETH_ADDRESS
    )));
    assert!(out.contains("Bridge fee 0.50000 DERO"));
    assert!(out.contains(&format!("Transaction submitted: txid = {}", TXID)));

    let submissions = h.ledger.submissions();
    assert_eq!(submissions.len(), 1);
    match &submissions[0] {
        Submission::Call {
            contract_id,
            transfers,
            args,
        } => {
            assert_eq!(contract_id, USDT_SCID);
            assert_eq!(transfers.len(), 2);
            assert_eq!(transfers[0].asset, USDT_SCID);
            assert_eq!(transfers[0].burn, 3_250_000);
            assert_eq!(transfers[1].asset, NATIVE_CONTRACT_ID);
            assert_eq!(transfers[1].burn, 50_000);
            assert!(transfers.iter().all(|t| t.destination.is_none()));

            assert_eq!(args[0].name, "entrypoint");
            assert_eq!(args[0].value, ArgValue::Text("Bridge".into()));
            assert_eq!(args[1].name, "eth_addr");
            assert_eq!(args[1].value, ArgValue::Text(ETH_ADDRESS.into()));
        }
        other => panic!("expected a contract call, got {:?}", other),
    }
}

#[tokio::test]
async fn test_bridge_rejects_malformed_eth_address() {
    let (editor, h) = scripted(&["y"]);
    h.console.eval("balance").await;
    h.console.eval(&format!("bridge USDT {} 1", RECIPIENT)).await;

    assert!(h.err.text().contains("Cannot parse Ethereum address"));
    assert!(h.ledger.submissions().is_empty());
    assert_eq!(editor.remaining(), 1);
}

// ─────────────────────────────────────────────────────────────────
// ROUTING & SESSION LIFECYCLE
// ─────────────────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_unknown_verb_reported_and_console_keeps_reading() {
    let (editor, h) = scripted(&["foo bar", "", "   ", "address", "quit", "balance"]);
    h.console.run().await.unwrap();

    assert!(h.err.text().contains("unknown command 'foo'"));
    assert!(h.out.text().contains(&format!("Wallet address {}", RECIPIENT)));
    // `balance` after quit was never read
    assert_eq!(editor.remaining(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_session_termination_paths() {
    // bye only ends interactive sessions
    let (editor, h) = scripted(&["bye", "help"]);
    h.console.run().await.unwrap();
    assert_eq!(editor.remaining(), 1);
    assert_eq!(h.console.eval("bye").await, Flow::Continue);
    assert!(h.err.text().contains("unknown command 'bye'"));
    assert_eq!(h.console.eval("EXIT").await, Flow::Quit);

    // interrupt with text discards the line, interrupt on an empty line ends
    let editor = Arc::new(ScriptedEditor::outcomes(vec![
        ReadOutcome::Interrupted("transfer USD".into()),
        ReadOutcome::Line("help".into()),
        ReadOutcome::Interrupted(String::new()),
        ReadOutcome::Line("address".into()),
    ]));
    let h = harness(editor.clone());
    h.console.run().await.unwrap();
    assert!(h.out.text().contains("Commands:"));
    assert_eq!(editor.remaining(), 1);

    // end of input ends immediately
    let editor = Arc::new(ScriptedEditor::outcomes(vec![ReadOutcome::EndOfInput]));
    let h = harness(editor.clone());
    h.console.run().await.unwrap();
    assert_eq!(editor.remaining(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_repeated_editor_failures_end_session_with_error() {
    let failure = || ReadOutcome::Failed(std::io::Error::new(std::io::ErrorKind::Other, "tty gone"));
    let editor = Arc::new(ScriptedEditor::outcomes(vec![failure(), failure(), failure(), failure()]));
    let h = harness(editor.clone());

    assert!(h.console.run().await.is_err());
    assert!(h.err.text().contains("tty gone"));
    assert_eq!(editor.remaining(), 1);
}

/// Stdout whose reader has gone away.
struct ClosedPipe;

impl Write for ClosedPipe {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "reader closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_closed_stdout_ends_session_with_error() {
    colored::control::set_override(false);
    let editor = Arc::new(ScriptedEditor::lines(&["help", "balance"]));
    let ledger = Arc::new(StubLedger::new());
    let output = Output::new(Box::new(ClosedPipe), Box::new(Capture::default()));
    let console = Console::new(
        test_config(),
        Arc::clone(&ledger) as Arc<dyn LedgerClient>,
        Arc::new(PromptLock::new(editor.clone(), "» ")),
        output.clone(),
    );

    let result = console.run().await;

    assert!(matches!(result, Err(ConsoleError::Output)));
    assert!(output.has_failed());
    // The failed `help` ends the session before `balance` is read.
    assert_eq!(editor.remaining(), 1);
}

#[tokio::test]
async fn test_balance_table_lists_tokens_then_native() {
    let (_editor, h) = scripted(&[]);
    h.console.eval("BALANCE").await;

    let out = h.out.text();
    let header = out.find("SYMBOL").unwrap();
    let usdt = out.find("USDT").unwrap();
    let dero = out.find("DERO").unwrap();
    assert!(header < usdt && usdt < dero, "output was:\n{}", out);
    assert!(out.contains("25.000000"));
    assert!(out.contains("12.34567"));
    assert!(out.contains(NATIVE_CONTRACT_ID));
}

#[tokio::test]
async fn test_offline_refresh_keeps_previous_registry() {
    let (_editor, h) = scripted(&["y"]);
    h.console.eval("balance").await;
    h.ledger.offline.store(true, Ordering::SeqCst);
    h.console.eval("balance").await;

    assert!(h.err.text().contains("Token registry unavailable"));
    assert!(h.console.registry().snapshot().get("USDT").is_some());

    h.ledger.offline.store(false, Ordering::SeqCst);
    h.console.eval(&format!("transfer USDT {} 1", RECIPIENT)).await;
    assert_eq!(h.ledger.submissions().len(), 1);
}

#[tokio::test]
async fn test_mode_switches_editor_bindings() {
    let (editor, h) = scripted(&[]);
    h.console.eval("mode vi").await;
    assert_eq!(*editor.mode.lock().unwrap(), Some(EditMode::Vi));

    h.console.eval("mode nano").await;
    assert!(h.err.text().contains("invalid mode: nano"));
    assert_eq!(*editor.mode.lock().unwrap(), Some(EditMode::Vi));
    assert_eq!(h.prompt.lock().await.mode(), EditMode::Vi);
}

#[tokio::test]
async fn test_help_lists_every_verb() {
    let (_editor, h) = scripted(&[]);
    h.console.eval("?").await;
    let out = h.out.text();
    for verb in ["help", "address", "balance", "transfer", "bridge", "mode", "quit"] {
        assert!(out.contains(verb), "help is missing {}", verb);
    }
}
