use dotenv::dotenv;
use follow_graph::{settings, utils::range::ListRange, AppState};
use inquire::{Confirm, Password, PasswordDisplayMode, Select, Text};
use uuid::Uuid;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    let settings = settings::load_settings()?;
    let state = follow_graph::setup_services(&settings).await?;

    run_cli(&state).await
}

async fn run_cli(state: &AppState) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        let choices = vec![
            "Create User",
            "Follow User",
            "Unfollow User",
            "Check Following",
            "List Followers",
            "List Following",
            "Exit",
        ];

        let choice = Select::new("Select an action:", choices).prompt()?;

        // Domain errors are shown and the menu continues.
        let result = match choice {
            "Create User" => create_user(state).await,
            "Follow User" => follow_user(state).await,
            "Unfollow User" => unfollow_user(state).await,
            "Check Following" => check_following(state).await,
            "List Followers" => list_followers(state).await,
            "List Following" => list_following(state).await,
            "Exit" => break,
            _ => unreachable!(),
        };

        if let Err(e) = result {
            println!("Error: {}", e);
        }
    }

    Ok(())
}

fn get_user_id(prompt: &str) -> Result<Uuid, Box<dyn std::error::Error>> {
    let input = Text::new(prompt).prompt()?;
    Ok(Uuid::parse_str(input.trim())?)
}

fn get_range() -> Result<ListRange, Box<dyn std::error::Error>> {
    if !Confirm::new("Limit the listing?").with_default(false).prompt()? {
        return Ok(ListRange::ALL);
    }
    let start = Text::new("Start index:").with_default("0").prompt()?.parse()?;
    let stop = Text::new("Stop index (-1 for the end):")
        .with_default("-1")
        .prompt()?
        .parse()?;
    Ok(ListRange::new(start, stop))
}

async fn create_user(state: &AppState) -> Result<(), Box<dyn std::error::Error>> {
    let username = Text::new("Enter username:").prompt()?;
    let password = Password::new("Enter password (optional):")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()?;
    let password = (!password.is_empty()).then_some(password);

    let user = state
        .user_service
        .create(&username, password.as_deref())
        .await?;
    println!("User created with ID: {}", user.id);
    Ok(())
}

async fn follow_user(state: &AppState) -> Result<(), Box<dyn std::error::Error>> {
    let follower_id = get_user_id("Enter follower ID:")?;
    let followed_id = get_user_id("Enter followed ID:")?;

    state.follow_service.follow(follower_id, followed_id).await?;
    println!("User followed successfully");
    Ok(())
}

async fn unfollow_user(state: &AppState) -> Result<(), Box<dyn std::error::Error>> {
    let follower_id = get_user_id("Enter follower ID:")?;
    let followed_id = get_user_id("Enter followed ID:")?;

    if state.follow_service.unfollow(follower_id, followed_id).await? {
        println!("User unfollowed successfully");
    } else {
        println!("User was not following");
    }
    Ok(())
}

async fn check_following(state: &AppState) -> Result<(), Box<dyn std::error::Error>> {
    let follower_id = get_user_id("Enter follower ID:")?;
    let followed_id = get_user_id("Enter followed ID:")?;

    let following = state
        .follow_service
        .is_following(follower_id, followed_id)
        .await?;
    println!("Following: {}", following);
    Ok(())
}

async fn list_followers(state: &AppState) -> Result<(), Box<dyn std::error::Error>> {
    let user_id = get_user_id("Enter user ID:")?;
    let range = get_range()?;

    let ids = state.follow_service.get_followers(user_id, range).await?;
    println!("Followers:");
    for follower in state.user_service.get_users(&ids).await? {
        println!("- {} ({})", follower.username, follower.id);
    }
    Ok(())
}

async fn list_following(state: &AppState) -> Result<(), Box<dyn std::error::Error>> {
    let user_id = get_user_id("Enter user ID:")?;
    let range = get_range()?;

    let ids = state.follow_service.get_following(user_id, range).await?;
    println!("Following:");
    for followed in state.user_service.get_users(&ids).await? {
        println!("- {} ({})", followed.username, followed.id);
    }
    Ok(())
}
