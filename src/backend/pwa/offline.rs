//! Themed offline fallback page

use crate::backend::pages::AiPage;
use crate::backend::render::escape::attr;
use crate::backend::render::pwa_tags::{app_name, background_color, theme_color};

pub fn offline_page(page: &AiPage) -> String {
    let name = attr(app_name(page));
    let theme = attr(theme_color(page));
    let background = attr(background_color(page));

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Offline - {name}</title>
  <meta name="theme-color" content="{theme}">
  <meta name="apple-mobile-web-app-capable" content="yes">
  <meta name="apple-mobile-web-app-status-bar-style" content="default">
  <script src="https://cdn.tailwindcss.com"></script>
  <style>
    body {{ background-color: {background}; }}
    .theme-color {{ color: {theme}; }}
    .theme-bg {{ background-color: {theme}; }}
  </style>
</head>
<body class="min-h-screen flex items-center justify-center p-4">
  <div class="text-center max-w-md mx-auto">
    <div class="mb-8">
      <div class="w-24 h-24 mx-auto theme-bg rounded-full flex items-center justify-center">
        <svg class="w-12 h-12 text-white" fill="none" stroke="currentColor" viewBox="0 0 24 24">
          <path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M18.364 5.636l-3.536 3.536m0 5.656l3.536 3.536M9.172 9.172L5.636 5.636m3.536 9.192L5.636 18.364M12 2.25a9.75 9.75 0 100 19.5 9.75 9.75 0 000-19.5z"></path>
        </svg>
      </div>
    </div>
    <h1 class="text-3xl font-bold theme-color mb-4">You are offline</h1>
    <p class="text-gray-600 mb-8 leading-relaxed">
      {name} is not available offline right now.
      Check your internet connection and try again.
    </p>
    <div class="space-y-4">
      <button onclick="window.location.reload()" class="w-full theme-bg text-white px-6 py-3 rounded-lg font-medium hover:opacity-90 transition-opacity">
        Try again
      </button>
      <button onclick="window.history.back()" class="w-full border-2 border-gray-300 text-gray-700 px-6 py-3 rounded-lg font-medium hover:bg-gray-50 transition-colors">
        &larr; Back
      </button>
    </div>
    <div class="mt-8 text-sm text-gray-500">
      <p class="mt-2">App: <span class="font-medium theme-color">{name}</span></p>
    </div>
  </div>
  <script>
    window.addEventListener('online', function() {{
      if ('Notification' in window && Notification.permission === 'granted') {{
        new Notification('Connection restored', {{ body: 'You are back online. Reloading the page...' }});
      }}
      window.location.reload();
    }});
  </script>
</body>
</html>"#
    )
}
