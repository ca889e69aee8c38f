use dotenv::dotenv;
use follow_graph::settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    let settings = settings::load_settings()?;
    follow_graph::init_tracing(&settings);

    let state = follow_graph::setup_services(&settings).await?;
    seed::seed_data(&state, 10, 15).await?;

    Ok(())
}

mod seed {
    use fake::{faker::internet::en::Username, Fake, Faker};
    use follow_graph::{utils::api_errors::ApiError, AppState};
    use tracing::{info, warn};
    use uuid::Uuid;

    pub async fn seed_data(
        state: &AppState,
        users: usize,
        follows: usize,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let user_ids = seed_users(state, users).await?;
        if user_ids.len() < 2 {
            warn!("Not enough users to seed follows");
            return Ok(());
        }

        seed_user_follows(state, &user_ids, follows).await?;

        info!("Seed data inserted successfully");
        Ok(())
    }

    async fn seed_users(
        state: &AppState,
        count: usize,
    ) -> Result<Vec<Uuid>, Box<dyn std::error::Error>> {
        let mut user_ids = Vec::new();

        for _ in 0..count {
            let username: String = Username().fake();
            match state.user_service.create(&username, Some("password")).await {
                Ok(user) => user_ids.push(user.id),
                Err(ApiError::UsernameTaken | ApiError::InvalidUsername) => {
                    warn!("Skipping username {}", username);
                }
                Err(e) => return Err(e.into()),
            }
        }

        Ok(user_ids)
    }

    async fn seed_user_follows(
        state: &AppState,
        user_ids: &[Uuid],
        count: usize,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let mut created = 0;

        for _ in 0..count {
            let follower_id = user_ids[Faker.fake::<usize>() % user_ids.len()];
            let mut followed_id = user_ids[Faker.fake::<usize>() % user_ids.len()];

            while follower_id == followed_id {
                followed_id = user_ids[Faker.fake::<usize>() % user_ids.len()];
            }

            match state.follow_service.follow(follower_id, followed_id).await {
                Ok(()) => created += 1,
                Err(ApiError::AlreadyFollowing) => {}
                Err(e) => return Err(e.into()),
            }
        }

        info!("Created {} follows", created);
        Ok(())
    }
}
