/// Extracts the `page_info` cursor of the `rel="next"` entry from a Shopify `Link` header, e.g.
///
/// ```text
/// <https://shop.myshopify.com/admin/api/2024-04/products.json?limit=50&page_info=abc>; rel="previous",
/// <https://shop.myshopify.com/admin/api/2024-04/products.json?limit=50&page_info=def>; rel="next"
/// ```
pub fn next_page_info(link_header: &str) -> Option<String> {
    link_header.split(',').find_map(|link| {
        let mut parts = link.split(';');
        let url = parts.next()?.trim().strip_prefix('<')?.strip_suffix('>')?;
        let is_next = parts.any(|p| matches!(p.trim(), r#"rel="next""# | "rel=next"));
        if !is_next {
            return None;
        }
        let (_, query) = url.split_once('?')?;
        query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(k, _)| *k == "page_info")
            .map(|(_, v)| v.to_string())
    })
}
