//! Example: random pushes on the swing-up task
//!
//! Run with `RUST_LOG=debug` to see per-step logging, and with
//! `--features visualization -- --render` to write PNG frames.

use rand::rngs::StdRng;
use rand::SeedableRng;
use swingup_rl_env::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let render = std::env::args().any(|arg| arg == "--render");
    let config = SwingUpConfig {
        seed: Some(7),
        render_enabled: render,
        ..Default::default()
    };
    let mut env = TrackedEnvironment::new(SwingUpEnv::new(config)?);
    let action_space = env.action_space();
    let mut rng = StdRng::seed_from_u64(7);

    let num_episodes = 5;
    let mut episode_rewards = Vec::new();

    for episode in 0..num_episodes {
        env.reset()?;
        let mut total_reward = 0.0;
        let mut steps = 0;

        loop {
            let step = env.step(action_space.sample(&mut rng))?;
            total_reward += step.reward.value();
            steps += 1;
            if render {
                env.render()?;
            }
            if step.done {
                break;
            }
        }

        episode_rewards.push(total_reward);
        println!(
            "Episode {}: Total Reward = {:.2}, Steps = {}",
            episode + 1,
            total_reward,
            steps
        );
    }

    let avg_reward = episode_rewards.iter().sum::<f64>() / f64::from(num_episodes);
    println!("\nAverage Reward over {num_episodes} episodes: {avg_reward:.2}");

    env.close()?;
    Ok(())
}
