mod console;

use anyhow::{Context, Result, anyhow, bail};
use app::{
    ClientConfig, ClientOrchestrator, DEFAULT_BASE_URL, FormError, ProfileForm, PurchaseOutcome,
    SignupForm,
};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use console::{ConsoleCheckout, ConsoleNavigator, ConsoleNotifier};
use model::{CandidateProfile, Decision, MembershipPlan};
use std::sync::Arc;
use std::time::Duration;
use swipe::{PacedAnimator, Settlement};

/// DevFinder - swipe to connect with developers
#[derive(Parser)]
#[command(name = "devfinder")]
#[command(about = "Terminal client for the DevFinder network", long_about = None)]
struct Cli {
    /// API base URL
    #[arg(long, env = "DEVFINDER_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Account email; logs in before running the command
    #[arg(long, env = "DEVFINDER_EMAIL")]
    email: Option<String>,

    /// Account password
    #[arg(long, env = "DEVFINDER_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value = "10")]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the profiles waiting in your feed
    Feed {
        /// Number of profiles to show
        #[arg(long, default_value = "10")]
        limit: usize,
    },

    /// Decide on the profile at the top of your feed
    Swipe(SwipeArgs),

    /// List connection requests you received
    Requests,

    /// Accept a connection request
    Accept {
        /// Request ID
        id: String,
    },

    /// Reject a connection request
    Reject {
        /// Request ID
        id: String,
    },

    /// List your connections
    Connections,

    /// Show your profile
    Profile,

    /// Update your profile; only the given fields change
    EditProfile(EditProfileArgs),

    /// Create an account
    Signup(SignupArgs),

    /// End the session
    Logout,

    /// Premium membership
    Premium {
        #[command(subcommand)]
        command: PremiumCommands,
    },
}

impl Commands {
    fn needs_session(&self) -> bool {
        !matches!(
            self,
            Commands::Signup(_)
                | Commands::Premium {
                    command: PremiumCommands::Plans
                }
        )
    }
}

#[derive(Args)]
struct SwipeArgs {
    #[command(flatten)]
    gesture: Gesture,

    /// Release velocity in px/s (with --drag)
    #[arg(long, default_value = "0", allow_hyphen_values = true, requires = "drag")]
    velocity: f32,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct Gesture {
    /// Drag the card by OFFSET pixels and release (negative is left)
    #[arg(long, allow_hyphen_values = true)]
    drag: Option<f32>,

    /// Connect with the profile
    #[arg(long)]
    interested: bool,

    /// Pass on the profile
    #[arg(long)]
    pass: bool,
}

#[derive(Args)]
struct EditProfileArgs {
    #[arg(long, default_value = "")]
    first_name: String,
    #[arg(long, default_value = "")]
    last_name: String,
    #[arg(long = "new-email", default_value = "")]
    email_id: String,
    #[arg(long, default_value = "")]
    photo_url: String,
    #[arg(long, default_value = "")]
    gender: String,
    #[arg(long, default_value = "")]
    age: String,
    #[arg(long, default_value = "")]
    about: String,
    /// Skill to list on the profile (repeatable)
    #[arg(long = "skill")]
    skills: Vec<String>,
}

#[derive(Args)]
struct SignupArgs {
    #[arg(long, default_value = "")]
    first_name: String,
    #[arg(long, default_value = "")]
    last_name: String,
    #[arg(long = "signup-email", default_value = "")]
    email_id: String,
    #[arg(long = "signup-password", default_value = "")]
    password: String,
    /// male, female or other
    #[arg(long, default_value = "")]
    gender: String,
}

#[derive(Subcommand)]
enum PremiumCommands {
    /// Check whether your membership is active
    Status,
    /// List membership plans
    Plans,
    /// Buy a membership plan
    Buy {
        /// silver, gold or platinum
        plan: MembershipPlan,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = ClientConfig::new(cli.base_url.clone())
        .with_request_timeout(Duration::from_secs(cli.timeout_secs));
    let client = ClientOrchestrator::new(
        config,
        Arc::new(ConsoleNotifier),
        Arc::new(ConsoleNavigator),
    )?
    .with_animator(Arc::new(PacedAnimator));

    if cli.command.needs_session() {
        authenticate(&client, &cli).await?;
    }

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Feed { limit } => handle_feed(&client, limit).await?,
        Commands::Swipe(args) => handle_swipe(&client, args).await?,
        Commands::Requests => handle_requests(&client).await?,
        Commands::Accept { id } => {
            client.requests().accept(&id).await?;
        }
        Commands::Reject { id } => {
            client.requests().reject(&id).await?;
        }
        Commands::Connections => handle_connections(&client).await?,
        Commands::Profile => handle_profile(&client)?,
        Commands::EditProfile(args) => handle_edit_profile(&client, args).await?,
        Commands::Signup(args) => handle_signup(&client, &args).await?,
        Commands::Logout => {
            client.session().logout().await?;
            println!("{} Logged out", "✓".green());
        }
        Commands::Premium { command } => handle_premium(&client, command).await?,
    }

    Ok(())
}

/// Log in with credentials when given, otherwise restore the session.
async fn authenticate(client: &ClientOrchestrator, cli: &Cli) -> Result<()> {
    match (&cli.email, &cli.password) {
        (Some(email), Some(password)) => {
            client.login(email, password).await?;
        }
        (Some(_), None) | (None, Some(_)) => {
            bail!("--email and --password must be given together")
        }
        (None, None) => {
            client
                .start()
                .await?
                .ok_or_else(|| anyhow!("No active session"))?;
        }
    }
    Ok(())
}

/// Handle the 'feed' command
async fn handle_feed(client: &ClientOrchestrator, limit: usize) -> Result<()> {
    client.feed().ensure_loaded().await?;
    let feed = client.store().feed().snapshot();

    if feed.is_empty() {
        println!("No new developers to show right now. Check back later.");
        return Ok(());
    }

    println!("{}", format!("Your feed ({} profiles):", feed.len()).bold().blue());
    for (idx, profile) in feed.iter().take(limit).enumerate() {
        print_profile(idx + 1, profile);
    }
    Ok(())
}

/// Handle the 'swipe' command
async fn handle_swipe(client: &ClientOrchestrator, args: SwipeArgs) -> Result<()> {
    client.feed().ensure_loaded().await?;
    let card = client
        .swipe()
        .active_card()
        .ok_or_else(|| anyhow!("Your feed is empty"))?;
    println!("{} {}", "Deciding on".dimmed(), card.full_name().bold());

    let settlement = match (args.gesture.drag, args.gesture.interested, args.gesture.pass) {
        (Some(offset), _, _) => {
            // Walk the card out in a few steps so the labels can be shown
            for step in 1..=4 {
                let position = offset * step as f32 / 4.0;
                if let Some(visuals) = client.swipe().drag_to(position) {
                    tracing::debug!(
                        "offset {:.0} rotation {:.1} opacity {:.2}",
                        visuals.offset,
                        visuals.rotation,
                        visuals.opacity
                    );
                }
            }
            let visuals = client.swipe().visuals();
            if visuals.interested_opacity > 0.0 {
                println!("  {} ({:.0}%)", "INTERESTED".green(), visuals.interested_opacity * 100.0);
            } else if visuals.ignore_opacity > 0.0 {
                println!("  {} ({:.0}%)", "IGNORE".red(), visuals.ignore_opacity * 100.0);
            }
            client.swipe().release(offset, args.velocity).await
        }
        (None, true, _) => client.swipe().press(Decision::Interested).await,
        (None, _, true) => client.swipe().press(Decision::Ignored).await,
        (None, false, false) => bail!("Choose --drag, --interested or --pass"),
    };

    match settlement {
        Settlement::Accepted { .. } => {
            if let Some(next) = client.swipe().active_card() {
                println!("{} {}", "Next up:".dimmed(), next.full_name());
            } else {
                println!("{}", "That was the last profile in your feed.".dimmed());
            }
            Ok(())
        }
        Settlement::Cancelled => {
            println!("Released below the threshold; the card springs back.");
            Ok(())
        }
        Settlement::Reverted { error, .. } => Err(error).context("Decision was not recorded"),
        Settlement::Rejected => bail!("Another decision is still in flight"),
        Settlement::NoActiveCard => bail!("Your feed is empty"),
    }
}

/// Handle the 'requests' command
async fn handle_requests(client: &ClientOrchestrator) -> Result<()> {
    client.requests().load().await?;
    let requests = client.store().requests().snapshot();
    if requests.is_empty() {
        println!("No pending connection requests.");
        return Ok(());
    }

    println!("{}", "Connection requests:".bold().blue());
    for request in &requests {
        let about = request
            .from_user
            .as_ref()
            .map(|p| p.about.as_str())
            .unwrap_or_default();
        println!("{} {} - {}", request.id.cyan(), request.sender_name().bold(), about);
    }
    println!("Use `devfinder accept ID` or `devfinder reject ID`.");
    Ok(())
}

/// Handle the 'connections' command
async fn handle_connections(client: &ClientOrchestrator) -> Result<()> {
    client.connections().load().await?;
    let connections = client.store().connections().get();
    if connections.is_empty() {
        println!("No connections yet. Start swiping!");
        return Ok(());
    }

    println!("{}", format!("Connections ({}):", connections.len()).bold().blue());
    for (idx, profile) in connections.iter().enumerate() {
        print_profile(idx + 1, profile);
    }
    Ok(())
}

/// Handle the 'profile' command
fn handle_profile(client: &ClientOrchestrator) -> Result<()> {
    let user = client
        .store()
        .user()
        .get()
        .ok_or_else(|| anyhow!("Not logged in"))?;

    println!("{}", user.full_name().bold().blue());
    if let Some(email) = &user.email_id {
        println!("{}Email: {}", "• ".green(), email);
    }
    if let Some(age) = user.age {
        println!("{}Age: {}", "• ".green(), age);
    }
    if let Some(gender) = user.gender {
        println!("{}Gender: {}", "• ".green(), gender);
    }
    if let Some(about) = &user.about {
        println!("{}About: {}", "• ".green(), about);
    }
    if !user.skills.is_empty() {
        println!("{}Skills: {}", "• ".cyan(), user.skills.join(", "));
    }
    Ok(())
}

/// Handle the 'edit-profile' command
async fn handle_edit_profile(client: &ClientOrchestrator, args: EditProfileArgs) -> Result<()> {
    let mut form = ProfileForm {
        first_name: args.first_name,
        last_name: args.last_name,
        email_id: args.email_id,
        photo_url: args.photo_url,
        gender: args.gender,
        age: args.age,
        about: args.about,
        skills: Vec::new(),
    };
    for skill in &args.skills {
        form.add_skill(skill);
    }

    match client.profile().submit(&form).await {
        Ok(_) => Ok(()),
        Err(FormError::Invalid(errors)) => {
            print_field_errors(&errors);
            bail!("Profile not updated")
        }
        Err(e) => Err(e.into()),
    }
}

/// Handle the 'signup' command
async fn handle_signup(client: &ClientOrchestrator, args: &SignupArgs) -> Result<()> {
    let form = SignupForm {
        first_name: args.first_name.clone(),
        last_name: args.last_name.clone(),
        email_id: args.email_id.clone(),
        password: args.password.clone(),
        gender: args.gender.clone(),
    };

    match client.session().signup(&form).await {
        Ok(user) => {
            println!("Signed up as {}", user.full_name().bold());
            Ok(())
        }
        Err(FormError::Invalid(errors)) => {
            print_field_errors(&errors);
            bail!("Signup form is incomplete")
        }
        Err(FormError::Rejected { fields, source }) => {
            print_field_errors(&fields);
            Err(source).context("Signup rejected")
        }
        Err(e) => Err(e.into()),
    }
}

/// Handle the 'premium' subcommands
async fn handle_premium(client: &ClientOrchestrator, command: PremiumCommands) -> Result<()> {
    match command {
        PremiumCommands::Status => {
            if client.premium().status().await {
                println!("{} You are a premium member", "★".yellow());
            } else {
                println!("You are on the free plan. See `devfinder premium plans`.");
            }
        }
        PremiumCommands::Plans => print_plans(),
        PremiumCommands::Buy { plan } => {
            if client.premium().status().await {
                println!("{} You already have premium", "★".yellow());
                return Ok(());
            }
            match client.premium().purchase(plan, &ConsoleCheckout).await? {
                PurchaseOutcome::Activated | PurchaseOutcome::Pending => {}
                PurchaseOutcome::Dismissed => println!("Checkout closed."),
                other => bail!("Purchase did not complete: {:?}", other),
            }
        }
    }
    Ok(())
}

fn print_profile(rank: usize, profile: &CandidateProfile) {
    let mut details = Vec::new();
    if let Some(age) = profile.age {
        details.push(age.to_string());
    }
    if let Some(gender) = profile.gender {
        details.push(gender.to_string());
    }
    let details = if details.is_empty() {
        String::new()
    } else {
        format!(" ({})", details.join(", "))
    };

    println!(
        "{}. {}{} [{}]",
        rank.to_string().green(),
        profile.full_name().bold(),
        details,
        profile.initials().dimmed()
    );
    println!("   {}", profile.about);

    let badges = profile.skill_badges(3);
    if !badges.shown.is_empty() {
        let mut skills = badges.shown.join(", ");
        if badges.overflow > 0 {
            skills.push_str(&format!(" +{}", badges.overflow));
        }
        println!("   {}", skills.cyan());
    }
}

fn print_plans() {
    println!("{}", "Premium plans:".bold().blue());
    for plan in MembershipPlan::ALL {
        let name = if plan.highlighted() {
            format!("{} ★ {}", plan.name(), plan.badge()).yellow().bold()
        } else {
            format!("{} - {}", plan.name(), plan.badge()).bold()
        };
        println!("{} {} {}", name, plan.price_label(), plan.period());
        println!("   {}", plan.description());
        for feature in plan.features() {
            println!("   {} {}", "•".green(), feature);
        }
    }
}

fn print_field_errors(errors: &app::FieldErrors) {
    for (field, message) in errors.iter() {
        eprintln!("  {} {}: {}", "✗".red(), field, message);
    }
}
