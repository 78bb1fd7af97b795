//! Email records: save, load, list, delete.

use mg_proto::{Email, VerificationStatus};

use crate::db::Store;
use crate::error::StoreError;
use crate::models::EmailRow;

impl Store {
    /// Insert or replace `email`, returning the store-assigned id.
    ///
    /// An unsaved record (id 0) gets a fresh id; a record that already has
    /// one overwrites its row in place.
    pub async fn save_email(&self, email: &Email) -> Result<i64, StoreError> {
        let body_enc = self.encrypt_value(email.body.as_bytes())?;
        let image_enc = email
            .attached_image
            .as_deref()
            .map(|bytes| self.encrypt_value(bytes))
            .transpose()?;

        let id_param = if email.is_saved() {
            Some(email.id)
        } else {
            None
        };

        let result = sqlx::query(
            "INSERT OR REPLACE INTO emails \
             (id, sender_name, sender_email, subject, body_enc, attached_image_enc, \
              body_hash, image_hash, verification_status, imported_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id_param)
        .bind(&email.sender_name)
        .bind(&email.sender_email)
        .bind(&email.subject)
        .bind(&body_enc)
        .bind(image_enc.as_deref())
        .bind(&email.body_hash)
        .bind(&email.image_hash)
        .bind(email.verification_status.as_str())
        .bind(email.imported_at)
        .execute(&self.pool)
        .await?;

        let id = id_param.unwrap_or_else(|| result.last_insert_rowid());
        tracing::debug!(id, "email saved");
        Ok(id)
    }

    /// Load one email by id.
    pub async fn email_by_id(&self, id: i64) -> Result<Email, StoreError> {
        let row: Option<EmailRow> = sqlx::query_as("SELECT * FROM emails WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => self.row_to_email(row),
            None => Err(StoreError::NotFound(id)),
        }
    }

    /// All emails, newest import first. Ties on the timestamp fall back to
    /// the id so listing order is deterministic.
    pub async fn list_emails(&self) -> Result<Vec<Email>, StoreError> {
        let rows: Vec<EmailRow> =
            sqlx::query_as("SELECT * FROM emails ORDER BY imported_at DESC, id DESC")
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter().map(|row| self.row_to_email(row)).collect()
    }

    /// Persist a status transition for row `id`.
    pub async fn update_status(
        &self,
        id: i64,
        status: VerificationStatus,
    ) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE emails SET verification_status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    /// Delete one email. Deleting an id that is already gone is a no-op.
    pub async fn delete_email(&self, id: i64) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM emails WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Remove every record from the history.
    pub async fn clear_emails(&self) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM emails").execute(&self.pool).await?;
        tracing::info!("email history cleared");
        Ok(())
    }

    fn row_to_email(&self, row: EmailRow) -> Result<Email, StoreError> {
        let body_bytes = self.decrypt_value(&row.body_enc)?;
        let body = String::from_utf8(body_bytes)
            .map_err(|_| StoreError::Corrupted(format!("email {}: body is not UTF-8", row.id)))?;

        let attached_image = row
            .attached_image_enc
            .as_deref()
            .map(|b64| self.decrypt_value(b64))
            .transpose()?;

        Ok(Email {
            id: row.id,
            sender_name: row.sender_name,
            sender_email: row.sender_email,
            subject: row.subject,
            body,
            attached_image,
            body_hash: row.body_hash,
            image_hash: row.image_hash,
            verification_status: VerificationStatus::parse_lossy(&row.verification_status),
            imported_at: row.imported_at,
        })
    }
}
