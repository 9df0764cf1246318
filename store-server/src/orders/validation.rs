//! 下单校验 - 在任何写入之前执行

use shared::models::{CreateOrderRequest, MAX_ITEM_QUANTITY, OrderItem};
use shared::{AppError, AppResult, ErrorCode};

use crate::utils::validation::{
    MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
    validate_phone, validate_required_text,
};

pub fn validate_create(req: &CreateOrderRequest) -> AppResult<()> {
    validate_items(&req.items)?;

    let name = req.customer_name.as_deref().unwrap_or_default();
    validate_required_text(name, "customer_name", MAX_NAME_LEN)?;

    let phone = req.customer_phone.as_deref().unwrap_or_default();
    validate_phone(phone, "customer_phone")?;

    validate_optional_text(&req.customer_email, "customer_email", MAX_EMAIL_LEN)?;
    validate_optional_text(&req.notes, "notes", MAX_NOTE_LEN)?;
    validate_optional_text(&req.user_id, "user_id", MAX_SHORT_TEXT_LEN)?;
    Ok(())
}

/// Cart lines: at least one, each with an id and a quantity in `1..=MAX_ITEM_QUANTITY`
pub fn validate_items(items: &[OrderItem]) -> AppResult<()> {
    if items.is_empty() {
        return Err(AppError::with_message(ErrorCode::OrderEmpty, "Cart is empty"));
    }

    for (index, item) in items.iter().enumerate() {
        if item.id.trim().is_empty() {
            return Err(AppError::required("items.id", format!("Item {} has no id", index))
                .with_detail("index", index));
        }
        validate_required_text(&item.id, "items.id", MAX_SHORT_TEXT_LEN)?;
        if item.name.len() > MAX_NAME_LEN {
            return Err(AppError::validation(format!("Item {} name is too long", index))
                .with_detail("index", index));
        }
        if item.quantity < 1 {
            return Err(AppError::validation(format!(
                "Item {} quantity must be at least 1",
                item.id
            ))
            .with_detail("index", index));
        }
        if item.quantity > MAX_ITEM_QUANTITY {
            return Err(AppError::validation(format!(
                "Item {} quantity must be at most {}",
                item.id, MAX_ITEM_QUANTITY
            ))
            .with_detail("index", index)
            .with_detail("max", MAX_ITEM_QUANTITY));
        }
    }
    Ok(())
}
