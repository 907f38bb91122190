//! Resource-level normalization built on the field coercions in
//! [`super::value`].

use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde_json::Value;

use super::images::parse_images;
use super::specifications::normalize_specifications;
use super::value::{
    count, datetime, decimal, decode_embedded_json, display_value, field, flag, id,
    lenient_count, lenient_decimal, list, opt_text, slugify, text,
};
use crate::types::{
    CartItem, Category, CategoryId, CategoryRef, FavoriteItem, FavoriteKey, Order, OrderItem,
    OrderStatus, Pagination, PaymentMethod, Product, ProductId, ProductPage, ProductStatus,
    ShippingAddress,
};

const GALLERY_FIELDS: &[&str] = &["images", "image_urls", "gallery", "imageUrls"];
const MAIN_IMAGE_FIELDS: &[&str] = &["image_url", "image", "thumbnail", "main_image", "imageUrl"];

// =============================================================================
// Products
// =============================================================================

/// Coerce a product payload into the canonical [`Product`].
#[must_use]
pub fn normalize_product(raw: &Value) -> Product {
    let name = text(raw, &["name", "product_name", "title"]);
    let slug = opt_text(raw, &["slug"]).unwrap_or_else(|| slugify(&name));

    let (price, original_price) = pricing(raw);
    let stock_quantity = count(raw, &["stock_quantity", "stockQuantity", "stock", "quantity"]);

    let mut status = field(raw, &["status"])
        .and_then(Value::as_str)
        .map(ProductStatus::parse_lenient)
        .unwrap_or_default();
    if status == ProductStatus::Active && flag(raw, &["is_active", "isActive"]) == Some(false) {
        status = ProductStatus::Inactive;
    }

    let in_stock = status != ProductStatus::OutOfStock
        && flag(raw, &["in_stock", "inStock"]).unwrap_or(stock_quantity > 0);

    Product {
        id: id(raw, &["id", "product_id", "productId"]).unwrap_or(ProductId::new(0)),
        name,
        slug,
        description: text(raw, &["description", "long_description"]),
        short_description: text(raw, &["short_description", "shortDescription", "summary"]),
        price,
        original_price,
        category: category_ref(raw),
        brand: brand(raw),
        images: product_images(raw),
        specifications: field(raw, &["specifications", "specs", "attributes"])
            .map(normalize_specifications)
            .unwrap_or_default(),
        stock_quantity,
        in_stock,
        tags: tags(raw),
        status,
        is_featured: flag(raw, &["is_featured", "isFeatured", "featured"]).unwrap_or(false),
        created_at: datetime(raw, &["created_at", "createdAt"]),
    }
}

/// Selling price and, if discounted, the price it was reduced from.
///
/// Accepts both `price` + `original_price` and `price` + `sale_price`
/// conventions.
fn pricing(raw: &Value) -> (Decimal, Option<Decimal>) {
    let base = decimal(raw, &["price", "current_price"]).unwrap_or(Decimal::ZERO);
    let sale = decimal(raw, &["sale_price", "salePrice", "discount_price"]);

    if let Some(sale) = sale
        && sale > Decimal::ZERO
        && sale < base
    {
        return (sale, Some(base));
    }

    let original = decimal(
        raw,
        &["original_price", "originalPrice", "compare_price", "old_price"],
    )
    .filter(|original| *original > base);
    (base, original)
}

fn category_ref(raw: &Value) -> Option<CategoryRef> {
    let nested = field(raw, &["category"]);
    let reference = match nested {
        Some(object @ Value::Object(_)) => CategoryRef {
            id: id(object, &["id", "category_id"]),
            name: text(object, &["name", "title"]),
            slug: opt_text(object, &["slug"]),
        },
        Some(Value::String(name)) => CategoryRef {
            id: id(raw, &["category_id", "categoryId"]),
            name: name.trim().to_string(),
            slug: opt_text(raw, &["category_slug"]),
        },
        _ => CategoryRef {
            id: id(raw, &["category_id", "categoryId"]),
            name: text(raw, &["category_name", "categoryName"]),
            slug: opt_text(raw, &["category_slug"]),
        },
    };
    (reference.id.is_some() || !reference.name.is_empty()).then_some(reference)
}

fn brand(raw: &Value) -> String {
    match field(raw, &["brand", "brand_name", "manufacturer"]) {
        Some(object @ Value::Object(_)) => text(object, &["name", "title"]),
        Some(other) => display_value(other),
        None => String::new(),
    }
}

/// Gallery images, with the main image (when stored separately) first.
fn product_images(raw: &Value) -> Vec<String> {
    let gallery = field(raw, GALLERY_FIELDS)
        .map(parse_images)
        .unwrap_or_default();
    let main = field(raw, MAIN_IMAGE_FIELDS)
        .map(parse_images)
        .unwrap_or_default();

    let mut images = main;
    for url in gallery {
        if !images.contains(&url) {
            images.push(url);
        }
    }
    images
}

fn tags(raw: &Value) -> Vec<String> {
    let values: Vec<String> = match field(raw, &["tags"]) {
        Some(Value::Array(items)) => items.iter().map(display_value).collect(),
        Some(Value::String(joined)) => match decode_embedded_json(joined) {
            Some(Value::Array(items)) => items.iter().map(display_value).collect(),
            _ => joined.split(',').map(|tag| tag.trim().to_string()).collect(),
        },
        _ => Vec::new(),
    };
    values.into_iter().filter(|tag| !tag.is_empty()).collect()
}

/// A page of products plus pagination, from either a bare array or an
/// object with `products`/`items` and `pagination`.
#[must_use]
pub fn normalize_product_page(raw: &Value) -> ProductPage {
    let products: Vec<Product> = list(raw, &["products", "items", "rows"])
        .iter()
        .map(normalize_product)
        .collect();
    let pagination = normalize_pagination(raw, products.len());
    ProductPage {
        products,
        pagination,
    }
}

/// Product list without pagination (featured, search).
#[must_use]
pub fn normalize_products(raw: &Value) -> Vec<Product> {
    list(raw, &["products", "items", "rows", "results"])
        .iter()
        .map(normalize_product)
        .collect()
}

/// Pagination block, falling back to a single page of `fallback_count`.
#[must_use]
pub fn normalize_pagination(raw: &Value, fallback_count: usize) -> Pagination {
    let source = field(raw, &["pagination", "meta"]).unwrap_or(raw);
    let fallback = u32::try_from(fallback_count).unwrap_or(u32::MAX);

    let page = Some(count(source, &["page", "currentPage", "current_page"]))
        .filter(|page| *page > 0)
        .unwrap_or(1);
    let limit = Some(count(source, &["limit", "per_page", "perPage", "pageSize"]))
        .filter(|limit| *limit > 0)
        .unwrap_or_else(|| fallback.max(1));
    let total = field(source, &["total", "totalItems", "total_items", "count"])
        .and_then(lenient_decimal)
        .and_then(|total| total.trunc().to_u64())
        .unwrap_or_else(|| u64::from(fallback));
    let total_pages = Some(count(source, &["total_pages", "totalPages", "pages"]))
        .filter(|pages| *pages > 0)
        .unwrap_or_else(|| {
            u32::try_from(total.div_ceil(u64::from(limit)))
                .unwrap_or(u32::MAX)
                .max(1)
        });

    Pagination {
        page,
        limit,
        total,
        total_pages,
    }
}

/// Coerce a category payload.
#[must_use]
pub fn normalize_category(raw: &Value) -> Category {
    let name = text(raw, &["name", "title"]);
    Category {
        id: id(raw, &["id", "category_id"]).unwrap_or(CategoryId::new(0)),
        slug: opt_text(raw, &["slug"]).unwrap_or_else(|| slugify(&name)),
        name,
        description: text(raw, &["description"]),
        parent_id: id(raw, &["parent_id", "parentId"]),
        product_count: count(raw, &["product_count", "productCount", "products_count"]),
    }
}

/// Category list from a bare array or `{"categories": [...]}`.
#[must_use]
pub fn normalize_categories(raw: &Value) -> Vec<Category> {
    list(raw, &["categories", "items"])
        .iter()
        .map(normalize_category)
        .collect()
}

// =============================================================================
// Cart
// =============================================================================

/// Coerce one cart line. Lines without an id, or with a zero quantity, are
/// unusable and yield `None`.
#[must_use]
pub fn normalize_cart_item(raw: &Value) -> Option<CartItem> {
    let item_id = id(raw, &["id", "cart_item_id", "item_id", "cartItemId"])?;
    let quantity = count(raw, &["quantity", "qty"]);
    if quantity == 0 {
        return None;
    }

    let product = field(raw, &["product"]).filter(|p| p.is_object());
    let product_id = id(raw, &["product_id", "productId"])
        .or_else(|| product.and_then(|p| id(p, &["id"])))
        .unwrap_or(ProductId::new(0));

    let price = decimal(raw, &["price", "unit_price", "unitPrice"])
        .or_else(|| product.map(|p| pricing(p).0))
        .unwrap_or(Decimal::ZERO);

    let name = opt_text(raw, &["name", "product_name", "productName"])
        .or_else(|| product.and_then(|p| opt_text(p, &["name", "title"])))
        .unwrap_or_default();

    let image = [raw]
        .into_iter()
        .chain(product)
        .find_map(|source| {
            field(
                source,
                &["image", "image_url", "product_image", "images", "imageUrl"],
            )
            .map(parse_images)
            .and_then(|images| images.into_iter().next())
        });

    let stock_quantity = field(raw, &["stock_quantity", "stock"])
        .or_else(|| product.and_then(|p| field(p, &["stock_quantity", "stock"])))
        .and_then(lenient_count);

    Some(CartItem {
        id: item_id,
        product_id,
        quantity,
        price,
        name,
        image,
        stock_quantity,
    })
}

/// All usable lines of a cart payload (`[...]`, `{"items": [...]}` or
/// `{"cart": {"items": [...]}}`).
#[must_use]
pub fn normalize_cart_items(raw: &Value) -> Vec<CartItem> {
    list(raw, &["items", "cart_items", "cartItems"])
        .iter()
        .filter_map(normalize_cart_item)
        .collect()
}

// =============================================================================
// Favorites
// =============================================================================

/// Coerce a favorite record. The product may be nested under `product` or
/// flattened onto the record with a `product_id`.
#[must_use]
pub fn normalize_favorite(raw: &Value) -> Option<FavoriteItem> {
    let favorite_id = id(raw, &["id", "favorite_id", "favoriteId"])?;

    let product = match field(raw, &["product"]) {
        Some(nested @ Value::Object(_)) => {
            let mut product = normalize_product(nested);
            if product.id == ProductId::new(0)
                && let Some(product_id) = id(raw, &["product_id", "productId"])
            {
                product.id = product_id;
            }
            product
        }
        _ => {
            let mut product = normalize_product(raw);
            product.id = id(raw, &["product_id", "productId"])?;
            product
        }
    };
    if product.id == ProductId::new(0) {
        return None;
    }

    Some(FavoriteItem {
        key: FavoriteKey::Server(favorite_id),
        product: product.summary(),
        added_at: datetime(raw, &["added_at", "created_at", "createdAt"]).unwrap_or_else(Utc::now),
    })
}

/// All usable favorites of a list payload.
#[must_use]
pub fn normalize_favorites(raw: &Value) -> Vec<FavoriteItem> {
    list(raw, &["favorites", "items"])
        .iter()
        .filter_map(normalize_favorite)
        .collect()
}

// =============================================================================
// Orders
// =============================================================================

fn normalize_order_item(raw: &Value) -> OrderItem {
    let product = field(raw, &["product"]).filter(|p| p.is_object());
    OrderItem {
        product_id: id(raw, &["product_id", "productId"])
            .or_else(|| product.and_then(|p| id(p, &["id"]))),
        product_name: opt_text(raw, &["product_name", "name", "productName"])
            .or_else(|| product.and_then(|p| opt_text(p, &["name"])))
            .unwrap_or_default(),
        product_image: field(raw, &["product_image", "image", "image_url", "productImage"])
            .map(parse_images)
            .and_then(|images| images.into_iter().next()),
        price: decimal(raw, &["price", "unit_price", "unitPrice"]).unwrap_or(Decimal::ZERO),
        quantity: count(raw, &["quantity", "qty"]),
    }
}

fn shipping_address(raw: &Value) -> ShippingAddress {
    let nested = match field(raw, &["shipping_address", "shippingAddress"]) {
        Some(object @ Value::Object(_)) => Some(object.clone()),
        Some(Value::String(encoded)) => decode_embedded_json(encoded).filter(Value::is_object),
        _ => None,
    };

    if let Some(address) = nested {
        return ShippingAddress {
            full_name: text(&address, &["full_name", "fullName", "name"]),
            phone: text(&address, &["phone", "phone_number"]),
            address: text(&address, &["address", "street", "line1"]),
            city: text(&address, &["city", "province"]),
            district: opt_text(&address, &["district"]),
            ward: opt_text(&address, &["ward"]),
        };
    }

    ShippingAddress {
        full_name: text(raw, &["shipping_name", "full_name", "customer_name"]),
        phone: text(raw, &["shipping_phone", "phone", "customer_phone"]),
        address: text(raw, &["shipping_address", "address"]),
        city: text(raw, &["shipping_city", "city"]),
        district: opt_text(raw, &["shipping_district", "district"]),
        ward: opt_text(raw, &["shipping_ward", "ward"]),
    }
}

/// Coerce an order payload. Orders without an id yield `None`.
#[must_use]
pub fn normalize_order(raw: &Value) -> Option<Order> {
    let order_id = id(raw, &["id", "order_id", "orderId"])?;
    let items: Vec<OrderItem> = list(raw, &["items", "order_items", "orderItems"])
        .iter()
        .map(normalize_order_item)
        .collect();
    let items_total: Decimal = items.iter().map(OrderItem::subtotal).sum();

    Some(Order {
        id: order_id,
        order_number: opt_text(raw, &["order_number", "orderNumber", "order_code", "code"])
            .unwrap_or_else(|| format!("#{order_id}")),
        status: field(raw, &["status", "order_status"])
            .and_then(Value::as_str)
            .map(OrderStatus::parse_lenient)
            .unwrap_or_default(),
        total_amount: decimal(raw, &["total_amount", "totalAmount", "total", "total_price"])
            .unwrap_or(items_total),
        shipping_address: shipping_address(raw),
        payment_method: field(raw, &["payment_method", "paymentMethod"])
            .and_then(Value::as_str)
            .map(PaymentMethod::parse_lenient)
            .unwrap_or_default(),
        notes: opt_text(raw, &["notes", "note"]),
        created_at: datetime(raw, &["created_at", "createdAt", "order_date"]),
        items,
    })
}

/// All usable orders of a list payload.
#[must_use]
pub fn normalize_orders(raw: &Value) -> Vec<Order> {
    list(raw, &["orders", "items"])
        .iter()
        .filter_map(normalize_order)
        .collect()
}
