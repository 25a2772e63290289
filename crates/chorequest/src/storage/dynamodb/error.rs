//! DynamoDB error mapping.
//!
//! Maps AWS SDK errors to `StoreError` from `chorequest_core::storage`.
//! Throughput, limit and server errors become `Unavailable`; conflicts with
//! other transactions become `TransactionAborted`. Both are transient.

use std::fmt::Debug;

use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::get_item::GetItemError;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::operation::query::QueryError;
use aws_sdk_dynamodb::operation::scan::ScanError;
use aws_sdk_dynamodb::operation::transact_write_items::TransactWriteItemsError;
use aws_sdk_dynamodb::operation::update_item::UpdateItemError;
use aws_sdk_dynamodb::types::CancellationReason;
use chorequest_core::storage::{PrimaryKey, StoreError};

fn throughput_exceeded() -> StoreError {
    StoreError::Unavailable("Throughput exceeded, please retry".to_string())
}

fn request_limit_exceeded() -> StoreError {
    StoreError::Unavailable("Request limit exceeded, please retry".to_string())
}

fn internal_server_error() -> StoreError {
    StoreError::Unavailable("DynamoDB internal server error".to_string())
}

fn table_not_found() -> StoreError {
    StoreError::Unavailable("Table not found".to_string())
}

/// Map a PutItem SDK error to StoreError.
pub fn map_put_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<PutItemError, R>,
    key: &PrimaryKey,
) -> StoreError {
    match err.into_service_error() {
        PutItemError::ConditionalCheckFailedException(_) => StoreError::AlreadyExists {
            pk: key.pk.clone(),
            sk: key.sk.clone(),
        },
        PutItemError::ResourceNotFoundException(_) => table_not_found(),
        PutItemError::ProvisionedThroughputExceededException(_) => throughput_exceeded(),
        PutItemError::RequestLimitExceeded(_) => request_limit_exceeded(),
        PutItemError::TransactionConflictException(_) => {
            StoreError::TransactionAborted("Transaction conflict, please retry".to_string())
        }
        PutItemError::InternalServerError(_) => internal_server_error(),
        err => StoreError::Unavailable(format!("PutItem failed: {:?}", err)),
    }
}

/// Map a GetItem SDK error to StoreError.
pub fn map_get_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<GetItemError, R>,
) -> StoreError {
    match err.into_service_error() {
        GetItemError::ResourceNotFoundException(_) => table_not_found(),
        GetItemError::ProvisionedThroughputExceededException(_) => throughput_exceeded(),
        GetItemError::RequestLimitExceeded(_) => request_limit_exceeded(),
        GetItemError::InternalServerError(_) => internal_server_error(),
        err => StoreError::Unavailable(format!("GetItem failed: {:?}", err)),
    }
}

/// Map a Query SDK error to StoreError.
pub fn map_query_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<QueryError, R>,
) -> StoreError {
    match err.into_service_error() {
        QueryError::ResourceNotFoundException(_) => table_not_found(),
        QueryError::ProvisionedThroughputExceededException(_) => throughput_exceeded(),
        QueryError::RequestLimitExceeded(_) => request_limit_exceeded(),
        QueryError::InternalServerError(_) => internal_server_error(),
        err => StoreError::Unavailable(format!("Query failed: {:?}", err)),
    }
}

/// Map a Scan SDK error to StoreError.
pub fn map_scan_error<R: Debug + Send + Sync + 'static>(err: SdkError<ScanError, R>) -> StoreError {
    match err.into_service_error() {
        ScanError::ResourceNotFoundException(_) => table_not_found(),
        ScanError::ProvisionedThroughputExceededException(_) => throughput_exceeded(),
        ScanError::RequestLimitExceeded(_) => request_limit_exceeded(),
        ScanError::InternalServerError(_) => internal_server_error(),
        err => StoreError::Unavailable(format!("Scan failed: {:?}", err)),
    }
}

/// Map an UpdateItem SDK error to StoreError.
///
/// A failed condition includes the implicit existence check, so a missing
/// item also yields `ConditionFailed`.
pub fn map_update_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<UpdateItemError, R>,
) -> StoreError {
    match err.into_service_error() {
        UpdateItemError::ConditionalCheckFailedException(_) => {
            StoreError::ConditionFailed { index: 0 }
        }
        UpdateItemError::ResourceNotFoundException(_) => table_not_found(),
        UpdateItemError::ProvisionedThroughputExceededException(_) => throughput_exceeded(),
        UpdateItemError::RequestLimitExceeded(_) => request_limit_exceeded(),
        UpdateItemError::TransactionConflictException(_) => {
            StoreError::TransactionAborted("Transaction conflict, please retry".to_string())
        }
        UpdateItemError::InternalServerError(_) => internal_server_error(),
        err => StoreError::Unavailable(format!("UpdateItem failed: {:?}", err)),
    }
}

/// Map a TransactWriteItems SDK error to StoreError.
pub fn map_transact_write_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<TransactWriteItemsError, R>,
) -> StoreError {
    match err.into_service_error() {
        TransactWriteItemsError::TransactionCanceledException(canceled) => {
            map_cancellation_reasons(canceled.cancellation_reasons())
        }
        TransactWriteItemsError::TransactionInProgressException(_) => {
            StoreError::TransactionAborted("Transaction in progress, please retry".to_string())
        }
        TransactWriteItemsError::ResourceNotFoundException(_) => table_not_found(),
        TransactWriteItemsError::ProvisionedThroughputExceededException(_) => {
            throughput_exceeded()
        }
        TransactWriteItemsError::RequestLimitExceeded(_) => request_limit_exceeded(),
        TransactWriteItemsError::InternalServerError(_) => internal_server_error(),
        err => StoreError::Unavailable(format!("TransactWriteItems failed: {:?}", err)),
    }
}

/// Classify a canceled transaction by its per-item reasons.
///
/// Reasons are positional: entry `i` explains update `i`, with code `None`
/// for items that were fine. A failed condition wins over a conflict since
/// retrying would fail the same way.
pub fn map_cancellation_reasons(reasons: &[CancellationReason]) -> StoreError {
    let codes: Vec<Option<&str>> = reasons.iter().map(|r| r.code()).collect();

    if let Some(index) = codes
        .iter()
        .position(|code| *code == Some("ConditionalCheckFailed"))
    {
        return StoreError::ConditionFailed { index };
    }

    let failed: Vec<&str> = codes
        .into_iter()
        .flatten()
        .filter(|code| *code != "None")
        .collect();
    if failed.is_empty() {
        StoreError::TransactionAborted("Transaction canceled".to_string())
    } else {
        StoreError::TransactionAborted(format!("Transaction canceled: {}", failed.join(", ")))
    }
}
