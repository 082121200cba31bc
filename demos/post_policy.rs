use anyhow::Result;
use s3_post_policy::{base64, Config, Iso8601, SigningAlgorithm};
use std::{env, time::SystemTime};

fn main() -> Result<()> {
    env_logger::init();

    let config = match env::args().nth(1) {
        Some(path) => Config::load(path)?,
        None => Config::builder("s3-bucket")
            .key_prefix("uploads/")
            .acl("private")
            .content_type_prefix("image/")
            .size_range(Some(0), Some(5 * 1024 * 1024))
            .build(),
    };

    let now = SystemTime::now();
    let policy = config.policy_at(now)?;
    let json = policy.to_json()?;
    println!("x-amz-algorithm: {}", SigningAlgorithm::HmacSha256);
    println!("x-amz-date: {}", Iso8601::compact_from_system_time(now).full());
    println!("policy: {}", json);
    println!("Policy: {}", base64::encode_str(&json));
    Ok(())
}
