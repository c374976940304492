//! GraphQL operation definitions for the Shopify Admin API.
//!
//! Each operation is a marker type implementing [`graphql_client::GraphQLQuery`]
//! plus a module holding its query document, variables and response data,
//! laid out the way `graphql_client` codegen lays them out. Only the fields
//! the bundle workflow reads are selected.

use serde::{Deserialize, Serialize};

/// Implements [`graphql_client::GraphQLQuery`] for an operation marker type.
macro_rules! graphql_operation {
    ($name:ident, $module:ident) => {
        impl graphql_client::GraphQLQuery for $name {
            type Variables = $module::Variables;
            type ResponseData = $module::ResponseData;

            fn build_query(variables: Self::Variables) -> graphql_client::QueryBody<Self::Variables> {
                graphql_client::QueryBody {
                    variables,
                    query: $module::QUERY,
                    operation_name: $module::OPERATION_NAME,
                }
            }
        }
    };
}

// =============================================================================
// Shared response shapes
// =============================================================================

/// `{ id }` selection.
#[derive(Debug, Clone, Deserialize)]
pub struct IdNode {
    pub id: String,
}

/// `edges { node { ... } }` selection.
#[derive(Debug, Clone, Deserialize)]
pub struct Connection<T> {
    pub edges: Vec<Edge<T>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Edge<T> {
    pub node: T,
}

impl<T> Connection<T> {
    /// Consume the connection, yielding its nodes in order.
    pub fn into_nodes(self) -> impl Iterator<Item = T> {
        self.edges.into_iter().map(|e| e.node)
    }
}

/// `userErrors { field message }` selection.
#[derive(Debug, Clone, Deserialize)]
pub struct UserErrorNode {
    pub field: Option<Vec<String>>,
    pub message: String,
}

/// `pageInfo { hasNextPage endCursor }` selection.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

// =============================================================================
// Product lookup
// =============================================================================

pub struct GetProductDetails;
graphql_operation!(GetProductDetails, get_product_details);

pub mod get_product_details {
    use super::{Connection, Deserialize, IdNode, Serialize};

    pub const OPERATION_NAME: &str = "GetProductDetails";
    pub const QUERY: &str = r"query GetProductDetails($ids: [ID!]!) {
  nodes(ids: $ids) {
    __typename
    ... on Product {
      id
      title
      options {
        id
        name
        values
      }
      variants(first: 1) {
        edges {
          node {
            id
          }
        }
      }
    }
  }
}";

    #[derive(Debug, Serialize)]
    pub struct Variables {
        pub ids: Vec<String>,
    }

    #[derive(Debug, Deserialize)]
    pub struct ResponseData {
        pub nodes: Vec<Option<Node>>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(tag = "__typename")]
    pub enum Node {
        Product(ProductNode),
        #[serde(other)]
        Other,
    }

    #[derive(Debug, Deserialize)]
    pub struct ProductNode {
        pub id: String,
        pub title: String,
        #[serde(default)]
        pub options: Vec<ProductOptionNode>,
        pub variants: Connection<IdNode>,
    }

    #[derive(Debug, Deserialize)]
    pub struct ProductOptionNode {
        pub id: String,
        pub name: String,
        #[serde(default)]
        pub values: Vec<String>,
    }
}

pub struct GetFirstVariant;
graphql_operation!(GetFirstVariant, get_first_variant);

pub mod get_first_variant {
    use super::{Connection, Deserialize, IdNode, Serialize};

    pub const OPERATION_NAME: &str = "GetFirstVariant";
    pub const QUERY: &str = r"query GetFirstVariant($id: ID!) {
  product(id: $id) {
    variants(first: 1) {
      edges {
        node {
          id
        }
      }
    }
  }
}";

    #[derive(Debug, Serialize)]
    pub struct Variables {
        pub id: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct ResponseData {
        pub product: Option<Product>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Product {
        pub variants: Connection<IdNode>,
    }
}

// =============================================================================
// Bundle mutation and operation
// =============================================================================

pub struct ProductBundleCreate;
graphql_operation!(ProductBundleCreate, product_bundle_create);

pub mod product_bundle_create {
    use super::{Deserialize, Serialize, UserErrorNode};

    pub const OPERATION_NAME: &str = "ProductBundleCreate";
    pub const QUERY: &str = r"mutation ProductBundleCreate($input: ProductBundleCreateInput!) {
  productBundleCreate(input: $input) {
    productBundleOperation {
      id
      status
    }
    userErrors {
      field
      message
    }
  }
}";

    #[derive(Debug, Serialize)]
    pub struct Variables {
        pub input: ProductBundleCreateInput,
    }

    #[derive(Debug, Serialize)]
    pub struct ProductBundleCreateInput {
        pub title: String,
        pub components: Vec<ProductBundleComponentInput>,
    }

    #[derive(Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProductBundleComponentInput {
        pub product_id: String,
        pub quantity: u32,
        pub option_selections: Vec<OptionSelectionInput>,
    }

    #[derive(Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct OptionSelectionInput {
        pub component_option_id: String,
        pub name: String,
        pub values: Vec<String>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub product_bundle_create: Option<Payload>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Payload {
        pub product_bundle_operation: Option<Operation>,
        pub user_errors: Vec<UserErrorNode>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Operation {
        pub id: String,
        pub status: String,
    }
}

pub struct GetProductOperation;
graphql_operation!(GetProductOperation, get_product_operation);

pub mod get_product_operation {
    use super::{Deserialize, IdNode, Serialize, UserErrorNode};

    pub const OPERATION_NAME: &str = "GetProductOperation";
    pub const QUERY: &str = r"query GetProductOperation($id: ID!) {
  productOperation(id: $id) {
    status
    product {
      id
    }
    ... on ProductBundleOperation {
      id
      userErrors {
        field
        message
      }
    }
  }
}";

    #[derive(Debug, Serialize)]
    pub struct Variables {
        pub id: String,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub product_operation: Option<Operation>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Operation {
        pub id: Option<String>,
        pub status: String,
        pub product: Option<IdNode>,
        #[serde(default)]
        pub user_errors: Vec<UserErrorNode>,
    }
}

// =============================================================================
// Price update
// =============================================================================

pub struct ProductVariantsBulkUpdate;
graphql_operation!(ProductVariantsBulkUpdate, product_variants_bulk_update);

pub mod product_variants_bulk_update {
    use super::{Deserialize, Serialize, UserErrorNode};

    pub const OPERATION_NAME: &str = "ProductVariantsBulkUpdate";
    pub const QUERY: &str = r"mutation ProductVariantsBulkUpdate($productId: ID!, $variants: [ProductVariantsBulkInput!]!) {
  productVariantsBulkUpdate(productId: $productId, variants: $variants) {
    productVariants {
      id
      price
    }
    userErrors {
      field
      message
    }
  }
}";

    #[derive(Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub product_id: String,
        pub variants: Vec<ProductVariantsBulkInput>,
    }

    #[derive(Debug, Serialize)]
    pub struct ProductVariantsBulkInput {
        pub id: String,
        pub price: String,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub product_variants_bulk_update: Option<Payload>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Payload {
        pub product_variants: Option<Vec<Variant>>,
        pub user_errors: Vec<UserErrorNode>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Variant {
        pub id: String,
        pub price: String,
    }
}

// =============================================================================
// Listing and counts
// =============================================================================

pub struct GetBundleProducts;
graphql_operation!(GetBundleProducts, get_bundle_products);

pub mod get_bundle_products {
    use super::{Connection, Deserialize, PageInfo, Serialize};

    pub const OPERATION_NAME: &str = "GetBundleProducts";
    pub const QUERY: &str = r"query GetBundleProducts($first: Int!, $after: String, $query: String) {
  products(first: $first, after: $after, query: $query) {
    edges {
      node {
        id
        title
        handle
        tags
        variants(first: 10) {
          edges {
            node {
              id
              price
            }
          }
        }
      }
    }
    pageInfo {
      hasNextPage
      endCursor
    }
  }
}";

    #[derive(Debug, Serialize)]
    pub struct Variables {
        pub first: i64,
        pub after: Option<String>,
        pub query: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    pub struct ResponseData {
        pub products: ProductConnection,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProductConnection {
        #[serde(flatten)]
        pub connection: Connection<ProductNode>,
        pub page_info: PageInfo,
    }

    #[derive(Debug, Deserialize)]
    pub struct ProductNode {
        pub id: String,
        pub title: String,
        pub handle: String,
        #[serde(default)]
        pub tags: Vec<String>,
        pub variants: Connection<VariantNode>,
    }

    #[derive(Debug, Deserialize)]
    pub struct VariantNode {
        pub id: String,
        pub price: Option<String>,
    }
}

pub struct GetProductsCount;
graphql_operation!(GetProductsCount, get_products_count);

pub mod get_products_count {
    use super::{Deserialize, Serialize};

    pub const OPERATION_NAME: &str = "GetProductsCount";
    pub const QUERY: &str = r"query GetProductsCount {
  productsCount(limit: null) {
    count
  }
}";

    #[derive(Debug, Serialize)]
    pub struct Variables {}

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub products_count: Option<Count>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Count {
        pub count: u64,
    }
}
