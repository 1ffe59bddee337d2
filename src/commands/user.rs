use super::CommandContext;
use crate::error::{AppError, AppResult};

pub async fn register(ctx: &mut CommandContext, name: &str) -> AppResult<()> {
    let user = ctx.users.create(name).await?;
    ctx.config.set_user(&user.name)?;

    println!("User '{}' has been created", user.name);
    Ok(())
}

pub async fn login(ctx: &mut CommandContext, name: &str) -> AppResult<()> {
    let user = ctx
        .users
        .find_by_name(name)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "User '{}' (use 'register' to create a new user)",
                name
            ))
        })?;

    ctx.config.set_user(&user.name)?;

    println!("The current user is now '{}'", user.name);
    Ok(())
}

pub async fn list(ctx: &CommandContext) -> AppResult<()> {
    let users = ctx.users.find_all().await?;

    for user in users {
        let marker = if ctx.config.current_user_name.as_deref() == Some(user.name.as_str()) {
            " (current)"
        } else {
            ""
        };
        println!("{}{}", user.name, marker);
    }

    Ok(())
}

pub async fn reset(ctx: &CommandContext) -> AppResult<()> {
    let deleted = ctx.users.delete_all().await?;
    println!("Deleted {} user(s)", deleted);
    Ok(())
}
