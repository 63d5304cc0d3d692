/// A macro to simplify read-through caching with an `ExpiringCache`.
///
/// This macro checks if a fresh value is present in the cache.
/// If found, it returns the cached value.
/// If not found, it awaits the provided future to compute the value,
/// stores it in the cache with the given TTL, and then returns it.
/// Errors from the future are returned as-is and nothing is cached.
///
/// # Arguments
/// * `$cache`: The `ExpiringCache` to read from and write to.
/// * `$key`: The `CacheKey` for the value.
/// * `$ttl`: The time-to-live as a `std::time::Duration`.
/// * `$block`: A future producing `Result<T, _>` on a cache miss.
///
/// # Example
/// ```rust,ignore
/// let movies: Vec<Movie> = cached!(cache, CacheKey::Details(id), DEFAULT_TTL, async move {
///     fetch_details(id).await
/// })?;
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        let key = $key;
        if let Some(cached) = $cache.get(&key).await {
            Ok(cached)
        } else {
            match $block.await {
                Ok(value) => {
                    $cache.set_with_ttl(&key, &value, $ttl).await;
                    Ok(value)
                }
                Err(e) => Err(e),
            }
        }
    }};
}
