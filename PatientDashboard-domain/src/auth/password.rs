use crate::auth::token::SecurityError;

/// Hash a password with bcrypt at the default cost
pub fn hash_password(password: &str) -> Result<String, SecurityError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| SecurityError::PasswordHash(e.to_string()))
}

/// Check a password against a bcrypt hash on the blocking thread pool
pub async fn verify_password(password: String, hash: String) -> Result<bool, SecurityError> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| SecurityError::PasswordHash(format!("Password check did not complete: {}", e)))?
        .map_err(|e| SecurityError::PasswordHash(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_verify_password() {
        let hash = bcrypt::hash("s3cret", 4).unwrap();

        assert!(verify_password("s3cret".to_string(), hash.clone()).await.unwrap());
        assert!(!verify_password("wrong".to_string(), hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_verify_against_invalid_hash() {
        let result = verify_password("s3cret".to_string(), "not-a-hash".to_string()).await;
        assert!(matches!(result, Err(SecurityError::PasswordHash(_))));
    }
}
