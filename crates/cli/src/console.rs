//! Terminal implementations of the client's collaborators.

use app::{CheckoutOptions, CheckoutOutcome, CheckoutWidget, Navigator, Route};
use async_trait::async_trait;
use colored::Colorize;
use swipe::{Notice, NoticeKind, Notifier};
use tokio::io::{AsyncBufReadExt, BufReader};

/// Prints notices as coloured lines
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        let line = format!("{}: {}", notice.title.bold(), notice.description);
        match notice.kind {
            NoticeKind::Success => println!("{} {}", "✓".green(), line),
            NoticeKind::Error => eprintln!("{} {}", "✗".red(), line),
            NoticeKind::Info => println!("{} {}", "ℹ".blue(), line),
        }
    }
}

/// There are no pages in a terminal; navigation becomes a hint.
pub struct ConsoleNavigator;

impl Navigator for ConsoleNavigator {
    fn navigate(&self, route: Route) {
        match route {
            Route::Login => eprintln!(
                "{} {}",
                "→".yellow(),
                "Not logged in. Pass --email and --password (or DEVFINDER_EMAIL / DEVFINDER_PASSWORD)."
            ),
            other => tracing::debug!("Navigated to {} ({})", other, other.meta().title),
        }
    }
}

/// Shows the order and waits for the user to confirm the payment.
pub struct ConsoleCheckout;

#[async_trait]
impl CheckoutWidget for ConsoleCheckout {
    async fn open(&self, options: CheckoutOptions) -> CheckoutOutcome {
        println!("{}", "Checkout".bold().blue());
        println!("  {} {}", "Order:".cyan(), options.order_id);
        println!("  {} {}", "Item:".cyan(), options.description);
        println!(
            "  {} {:.2} {}",
            "Amount:".cyan(),
            options.amount as f64 / 100.0,
            options.currency
        );
        println!("  {} {}", "Key:".cyan(), options.key);
        if !options.prefill.email.is_empty() {
            println!("  {} {}", "Email:".cyan(), options.prefill.email);
        }
        println!("Complete the payment, then type 'paid', 'failed' or 'cancel':");

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => return CheckoutOutcome::Dismissed,
                Err(e) => {
                    return CheckoutOutcome::Failed {
                        description: Some(e.to_string()),
                    };
                }
            };
            match line.trim().to_lowercase().as_str() {
                "paid" => return CheckoutOutcome::Paid,
                "failed" => return CheckoutOutcome::Failed { description: None },
                "cancel" | "" => return CheckoutOutcome::Dismissed,
                other => println!("Unrecognised answer '{}'", other),
            }
        }
    }
}
