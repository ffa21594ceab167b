//! Shared test site: products referencing manufacturers and back.

use crate::memory::MemorySite;

pub(crate) fn site() -> MemorySite {
    MemorySite::builder()
        .page("products", [("title", "Products")])
        .page(
            "products/product-a",
            [
                ("title", "Product A"),
                ("price", "99.99"),
                ("rating", "5"),
                ("categories", "category-a, category-b"),
                ("manufacturer", "manufacturers/brand-a"),
            ],
        )
        .page(
            "products/product-b",
            [
                ("title", "Product B"),
                ("price", "49.5"),
                ("rating", "3"),
                ("categories", "category-b"),
                ("manufacturer", "manufacturers/brand-x"),
            ],
        )
        .page(
            "products/product-c",
            [
                ("title", "Product C"),
                ("price", "10"),
                ("rating", "4"),
                ("categories", "category-c|category-d"),
                ("manufacturer", ""),
            ],
        )
        .page("manufacturers", [("title", "Manufacturers")])
        .page(
            "manufacturers/brand-a",
            [
                ("title", "Brand A"),
                ("products", "- products/product-a\n- products/product-b\n"),
            ],
        )
        .page(
            "manufacturers/brand-b",
            [
                ("title", "Brand B"),
                ("products", "- products/product-x\n- products/product-c\n"),
            ],
        )
        .page(
            "manufacturers/brand-c",
            [
                ("title", "Brand C"),
                ("products", "- products/product-a\n- products/missing\n- products/product-c\n"),
            ],
        )
        .page(
            "manufacturers/brand-d",
            [
                ("title", "Brand D"),
                ("products", "products/product-b\nproducts/product-c\n"),
            ],
        )
        .build()
}
