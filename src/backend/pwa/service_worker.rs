//! Per-page service worker
//!
//! Static assets are cache-first, images cache-first with age and size
//! limits, documents network-first with an offline fallback, `/api/` calls
//! network-only.

use crate::backend::analytics::script::js_string;

const SERVICE_WORKER_TEMPLATE: &str = r#"const SLUG = '{{SLUG}}';
const CACHE_VERSION = 'v2';
const CACHE_NAME = 'pwa-' + SLUG + '-' + CACHE_VERSION;
const STATIC_CACHE = 'pwa-static-' + SLUG + '-' + CACHE_VERSION;
const DYNAMIC_CACHE = 'pwa-dynamic-' + SLUG + '-' + CACHE_VERSION;
const IMAGE_CACHE = 'pwa-images-' + SLUG + '-' + CACHE_VERSION;

const staticAssets = [
  '/' + SLUG,
  '/' + SLUG + '/manifest.json',
  'https://cdn.tailwindcss.com'
];

const CACHE_CONFIG = {
  images: { maxAge: 7 * 24 * 60 * 60 * 1000, maxItems: 50 },
  dynamic: { maxAge: 24 * 60 * 60 * 1000, maxItems: 100 }
};

self.addEventListener('install', (event) => {
  event.waitUntil(
    caches.open(STATIC_CACHE)
      .then((cache) => cache.addAll(staticAssets).catch((err) => {
        console.error('[SW] Failed to cache static assets:', err);
      }))
      .then(() => self.skipWaiting())
  );
});

self.addEventListener('activate', (event) => {
  event.waitUntil(
    caches.keys().then((cacheNames) => Promise.all(
      cacheNames.map((cacheName) => {
        if (cacheName.includes(SLUG) &&
            cacheName !== CACHE_NAME &&
            cacheName !== STATIC_CACHE &&
            cacheName !== DYNAMIC_CACHE &&
            cacheName !== IMAGE_CACHE) {
          return caches.delete(cacheName);
        }
      })
    )).then(() => self.clients.claim())
  );
});

async function cleanOldCache(cacheName, maxAge, maxItems) {
  const cache = await caches.open(cacheName);
  const now = Date.now();
  for (const request of await cache.keys()) {
    const response = await cache.match(request);
    const date = response && response.headers.get('date');
    if (date && now - new Date(date).getTime() > maxAge) {
      await cache.delete(request);
    }
  }
  const remaining = await cache.keys();
  if (remaining.length > maxItems) {
    for (const request of remaining.slice(0, remaining.length - maxItems)) {
      await cache.delete(request);
    }
  }
}

function getCacheStrategy(request) {
  const url = new URL(request.url);
  const extension = url.pathname.split('.').pop();
  if (['jpg', 'jpeg', 'png', 'gif', 'webp', 'svg', 'ico'].includes(extension)) {
    return 'cache-first-images';
  }
  if (request.destination === 'document' || extension === 'html') {
    return 'network-first';
  }
  if (['css', 'js'].includes(extension)) {
    return 'cache-first';
  }
  if (url.pathname.includes('/api/')) {
    return 'network-only';
  }
  return 'network-first';
}

async function cacheFirstImages(request) {
  const cache = await caches.open(IMAGE_CACHE);
  const cached = await cache.match(request);
  if (cached) {
    cleanOldCache(IMAGE_CACHE, CACHE_CONFIG.images.maxAge, CACHE_CONFIG.images.maxItems);
    return cached;
  }
  try {
    const response = await fetch(request);
    if (response.ok) cache.put(request, response.clone());
    return response;
  } catch (error) {
    return new Response('Image unavailable', { status: 503 });
  }
}

async function networkFirst(request) {
  const cache = await caches.open(DYNAMIC_CACHE);
  try {
    const response = await fetch(request, { cache: 'no-cache' });
    if (response.ok) cache.put(request, response.clone());
    return response;
  } catch (error) {
    const cached = await cache.match(request);
    if (cached) return cached;
    if (request.destination === 'document') {
      const offline = await cache.match('/' + SLUG + '/offline.html');
      if (offline) return offline;
    }
    return new Response('Offline', { status: 503 });
  }
}

async function cacheFirst(request) {
  const cache = await caches.open(STATIC_CACHE);
  const cached = await cache.match(request);
  if (cached) return cached;
  try {
    const response = await fetch(request);
    if (response.ok) cache.put(request, response.clone());
    return response;
  } catch (error) {
    return new Response('Resource unavailable', { status: 503 });
  }
}

self.addEventListener('fetch', (event) => {
  const request = event.request;
  if (request.method !== 'GET') return;
  if (new URL(request.url).protocol === 'chrome-extension:') return;

  switch (getCacheStrategy(request)) {
    case 'cache-first-images':
      event.respondWith(cacheFirstImages(request));
      break;
    case 'network-first':
      event.respondWith(networkFirst(request));
      break;
    case 'cache-first':
      event.respondWith(cacheFirst(request));
      break;
    case 'network-only':
      event.respondWith(fetch(request));
      break;
  }
});

self.addEventListener('message', (event) => {
  if (event.data && event.data.type === 'SKIP_WAITING') {
    self.skipWaiting();
  }
  if (event.data && event.data.type === 'CLEAN_CACHE') {
    event.waitUntil(Promise.all([
      cleanOldCache(IMAGE_CACHE, CACHE_CONFIG.images.maxAge, CACHE_CONFIG.images.maxItems),
      cleanOldCache(DYNAMIC_CACHE, CACHE_CONFIG.dynamic.maxAge, CACHE_CONFIG.dynamic.maxItems)
    ]));
  }
});

self.addEventListener('sync', (event) => {
  if (event.tag === 'sync-data') {
    event.waitUntil(Promise.resolve());
  }
});

console.log('[SW] Service worker ' + CACHE_VERSION + ' loaded for ' + SLUG);"#;

/// Service worker source for the page served under `slug`
pub fn service_worker(slug: &str) -> String {
    SERVICE_WORKER_TEMPLATE.replace("{{SLUG}}", &js_string(slug))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_is_embedded() {
        let sw = service_worker("coffee");
        assert!(sw.starts_with("const SLUG = 'coffee';"));
        assert!(sw.contains("SKIP_WAITING"));
        assert!(sw.contains("CLEAN_CACHE"));
        assert!(!sw.contains("{{"));
    }

    #[test]
    fn test_slug_is_escaped() {
        assert!(service_worker("it's").starts_with(r"const SLUG = 'it\'s';"));
    }
}
