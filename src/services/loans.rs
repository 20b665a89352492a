//! Loan management service

use crate::{
    error::{AppError, AppResult},
    models::{
        book::BookStatus,
        borrow::{BorrowBook, BorrowRecord},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
}

impl LoansService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Borrow a book: mark every copy under the catalog code `Borrowed`,
    /// then append a borrow record.
    ///
    /// The two writes are not atomic. If the record cannot be written the
    /// previous statuses are put back before the error is returned. The
    /// current status is not checked, so a borrowed book can be borrowed
    /// again.
    pub async fn borrow_book(&self, student_id: &str, dewey_dec: &str, data: BorrowBook) -> AppResult<String> {
        let previous = self
            .repository
            .books
            .set_status_by_dewey_dec(dewey_dec, BookStatus::Borrowed)
            .await?;

        if previous.is_empty() {
            return Err(AppError::NotFound("Book not found".to_string()));
        }

        let record = BorrowRecord::new(student_id, dewey_dec, data);
        match self.repository.borrows.create(&record).await {
            Ok(id) => {
                tracing::info!(
                    "Loans: student {} borrowed {} ({} copies marked), record {}",
                    student_id,
                    dewey_dec,
                    previous.len(),
                    id
                );
                Ok(id)
            }
            Err(e) => {
                tracing::warn!("Loans: borrow record for {} failed, restoring book status", dewey_dec);
                if let Err(restore_err) = self.repository.books.restore_statuses(&previous).await {
                    tracing::error!("Loans: failed to restore status of {}: {}", dewey_dec, restore_err);
                }
                Err(e)
            }
        }
    }
}
