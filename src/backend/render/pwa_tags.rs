/**
 * PWA Head Tags and Client Script
 *
 * Manifest link, theme/Apple/Microsoft meta tags and icon links, plus the
 * client script that registers the page's service worker, announces
 * updates and shows the install banner.
 *
 * Asset URLs depend on how the page was reached: a custom root domain
 * serves its assets under `/root`, a custom domain bound to a slug under
 * `/{domain slug}`, and everything else under `/{slug}`.
 */

use super::escape::{attr, first};
use crate::backend::analytics::script::js_string;
use crate::backend::pages::AiPage;
use crate::backend::upstream::CustomDomain;

/// Icon used when the page has neither a PWA icon nor a favicon
pub const DEFAULT_PWA_ICON: &str = "/default-pwa-icon.png";

/// Slug a custom root domain is served under
pub const ROOT_SLUG: &str = "root";

pub const DEFAULT_THEME_COLOR: &str = "#000000";
pub const DEFAULT_BACKGROUND_COLOR: &str = "#ffffff";

/// Path prefix under which the page's manifest and service worker live
pub fn asset_base(slug: &str, custom_domain: Option<&CustomDomain>) -> String {
    match custom_domain {
        Some(domain) if domain.is_root_domain && slug == ROOT_SLUG => format!("/{ROOT_SLUG}"),
        Some(domain) => format!("/{}", domain.slug.as_deref().unwrap_or(slug)),
        None => format!("/{slug}"),
    }
}

/// Display name: `pwa_name` or the page title
pub fn app_name(page: &AiPage) -> &str {
    first(&[page.pwa_name.as_deref()]).unwrap_or(&page.title)
}

/// Short name: `pwa_short_name` or the first 12 characters of the title
pub fn short_name(page: &AiPage) -> String {
    match first(&[page.pwa_short_name.as_deref()]) {
        Some(name) => name.to_string(),
        None => page.title.chars().take(12).collect(),
    }
}

pub fn theme_color(page: &AiPage) -> &str {
    first(&[page.pwa_theme_color.as_deref()]).unwrap_or(DEFAULT_THEME_COLOR)
}

pub fn background_color(page: &AiPage) -> &str {
    first(&[page.pwa_background_color.as_deref()]).unwrap_or(DEFAULT_BACKGROUND_COLOR)
}

/// `pwa_icon_url`, then `favicon_url`
pub fn icon_url(page: &AiPage) -> Option<&str> {
    first(&[page.pwa_icon_url.as_deref(), page.favicon_url.as_deref()])
}

/// Head tags for an installable page; empty when PWA is disabled
pub fn pwa_tags(page: &AiPage, base: &str) -> String {
    if !page.pwa_enabled {
        return String::new();
    }

    let name = attr(app_name(page));
    let icon = attr(icon_url(page).unwrap_or(DEFAULT_PWA_ICON));
    let theme = attr(theme_color(page));
    let background = attr(background_color(page));

    format!(
        r#"
  <!-- PWA Configuration -->
  <link rel="manifest" href="{base}/manifest.json">
  <meta name="theme-color" content="{theme}">
  <meta name="apple-mobile-web-app-capable" content="yes">
  <meta name="apple-mobile-web-app-status-bar-style" content="default">
  <meta name="apple-mobile-web-app-title" content="{name}">
  <meta name="msapplication-TileColor" content="{background}">
  <meta name="msapplication-tap-highlight" content="no">

  <!-- PWA Icons -->
  <link rel="apple-touch-icon" href="{icon}">
  <link rel="icon" type="image/png" sizes="512x512" href="{icon}">
  <link rel="icon" type="image/png" sizes="192x192" href="{icon}">

  <!-- PWA Meta -->
  <meta name="application-name" content="{name}">
  <meta name="mobile-web-app-capable" content="yes">
  <meta name="format-detection" content="telephone=no">"#
    )
}

const PWA_SCRIPT_TEMPLATE: &str = r#"
  <script>
    var deferredPrompt = null;
    var isLocalhost = location.hostname === 'localhost' || location.hostname === '127.0.0.1';
    var themeColor = '{{THEME_COLOR}}';
    var backgroundColor = '{{BACKGROUND_COLOR}}';

    window.addEventListener('beforeinstallprompt', function(e) {
      e.preventDefault();
      deferredPrompt = e;
      window.__pwaPromptReady = true;
    });

    if (isLocalhost) {
      console.warn('PWA: beforeinstallprompt does not fire on localhost on Android. Use the browser menu to install.');
    }

    if ('serviceWorker' in navigator) {
      window.addEventListener('load', function() {
        navigator.serviceWorker.register('{{SW_URL}}')
          .then(function(registration) {
            registration.addEventListener('updatefound', function() {
              var newWorker = registration.installing;
              if (newWorker) {
                newWorker.addEventListener('statechange', function() {
                  if (newWorker.state === 'installed' && navigator.serviceWorker.controller) {
                    showUpdateNotification(newWorker);
                  }
                });
              }
            });
            setInterval(function() { registration.update(); }, 60 * 60 * 1000);
          })
          .catch(function(error) {
            console.log('PWA: service worker registration failed:', error);
          });
      });
    }

    function slideOutAndRemove(el) {
      el.style.animation = 'pwaSlideOut 0.3s ease-out';
      setTimeout(function() { el.remove(); }, 300);
    }

    function showUpdateNotification(newWorker) {
      if (document.getElementById('pwa-update-notification')) return;

      var notification = document.createElement('div');
      notification.id = 'pwa-update-notification';
      notification.style.cssText = 'position:fixed;top:20px;right:20px;left:20px;max-width:400px;margin:0 auto;' +
        'background:linear-gradient(135deg,' + themeColor + ',' + backgroundColor + ');color:white;border-radius:12px;' +
        'box-shadow:0 8px 32px rgba(0,0,0,0.2);padding:16px;z-index:1000000;display:flex;align-items:center;gap:12px;' +
        'animation:pwaSlideDown 0.4s ease-out;';
      notification.innerHTML =
        '<style>@keyframes pwaSlideDown{from{transform:translateY(-100px);opacity:0}to{transform:translateY(0);opacity:1}}' +
        '@keyframes pwaSlideOut{to{transform:translateY(-100px);opacity:0}}</style>' +
        '<div style="flex:1;min-width:0;"><h4 style="margin:0 0 4px;font-size:14px;font-weight:600;">New version available!</h4>' +
        '<p style="margin:0;font-size:12px;opacity:0.9;">Click to update and get the latest improvements</p></div>' +
        '<button id="pwa-update-btn" style="background:white;color:' + themeColor + ';border:none;padding:8px 16px;border-radius:8px;font-weight:600;cursor:pointer;font-size:13px;">Update</button>' +
        '<button id="pwa-update-dismiss" style="background:transparent;color:white;border:none;padding:8px;cursor:pointer;font-size:18px;opacity:0.8;line-height:1;">&#10005;</button>';
      document.body.appendChild(notification);

      notification.querySelector('#pwa-update-btn').addEventListener('click', function() {
        newWorker.postMessage({ type: 'SKIP_WAITING' });
        notification.style.animation = 'pwaSlideOut 0.3s ease-out';
        setTimeout(function() { window.location.reload(); }, 300);
      });
      notification.querySelector('#pwa-update-dismiss').addEventListener('click', function() {
        slideOutAndRemove(notification);
      });
      setTimeout(function() {
        if (document.getElementById('pwa-update-notification')) slideOutAndRemove(notification);
      }, 10000);
    }

    var showInstallPrompt = {{SHOW_INSTALL_PROMPT}};
    var pwaName = '{{APP_NAME}}';
    var pwaIcon = '{{ICON_URL}}';
    var isIOS = /iPad|iPhone|iPod/.test(navigator.userAgent) && !window.MSStream;
    var isStandalone = window.matchMedia('(display-mode: standalone)').matches || window.navigator.standalone === true;

    function promptInstall(banner) {
      deferredPrompt.prompt();
      deferredPrompt.userChoice.then(function(choice) {
        if (choice.outcome === 'accepted') {
          localStorage.setItem('pwa-installed', 'true');
        } else {
          localStorage.setItem('pwa-install-dismissed', 'true');
        }
        banner.remove();
        deferredPrompt = null;
      }).catch(function() { banner.remove(); });
    }

    function createInstallBanner() {
      if (isStandalone || localStorage.getItem('pwa-install-dismissed')) return;
      if (document.getElementById('pwa-install-banner')) return;

      var canPrompt = !isIOS && !isLocalhost;
      var hint = isIOS
        ? 'Tap Share and then "Add to Home Screen"'
        : isLocalhost
          ? 'Localhost: use the browser menu to install the app'
          : 'Get quick access and use it offline';
      var iconHtml = pwaIcon
        ? '<img src="' + pwaIcon + '" style="width:48px;height:48px;border-radius:12px;object-fit:cover;" alt="App Icon" />'
        : '<div style="flex-shrink:0;width:48px;height:48px;border-radius:12px;background:linear-gradient(135deg,' + themeColor + ',' + backgroundColor + ');"></div>';

      var banner = document.createElement('div');
      banner.id = 'pwa-install-banner';
      banner.style.cssText = 'position:fixed;bottom:20px;left:20px;right:20px;max-width:420px;margin:0 auto;background:white;' +
        'border-radius:16px;box-shadow:0 8px 32px rgba(0,0,0,0.15);padding:20px;z-index:999999;display:flex;' +
        'align-items:start;gap:16px;animation:pwaSlideUp 0.4s ease-out;';
      banner.innerHTML =
        '<style>@keyframes pwaSlideUp{from{transform:translateY(100px);opacity:0}to{transform:translateY(0);opacity:1}}</style>' +
        iconHtml +
        '<div style="flex:1;"><h3 style="margin:0 0 4px;font-size:16px;font-weight:600;color:#1a1a1a;">Install ' + pwaName + '</h3>' +
        '<p style="margin:0 0 12px;font-size:14px;color:#666;">' + hint + '</p><div style="display:flex;gap:8px;">' +
        (canPrompt ? '<button id="pwa-install-now" style="flex:1;background:' + themeColor + ';color:white;border:none;padding:10px 16px;border-radius:8px;font-weight:500;cursor:pointer;font-size:14px;">Install now</button>' : '') +
        '<button id="pwa-install-dismiss" style="flex:' + (canPrompt ? '0' : '1') + ';background:transparent;color:#666;border:1px solid #ddd;padding:10px 16px;border-radius:8px;font-weight:500;cursor:pointer;font-size:14px;">' +
        (canPrompt ? 'Not now' : 'Got it') + '</button></div></div>';
      document.body.appendChild(banner);

      banner.querySelector('#pwa-install-dismiss').addEventListener('click', function() {
        banner.remove();
        localStorage.setItem('pwa-install-dismissed', 'true');
      });

      var installBtn = banner.querySelector('#pwa-install-now');
      if (!installBtn) return;
      installBtn.addEventListener('click', function() {
        if (deferredPrompt) {
          promptInstall(banner);
          return;
        }
        installBtn.textContent = 'Please wait...';
        installBtn.disabled = true;
        var attempts = 0;
        var check = setInterval(function() {
          attempts++;
          if (deferredPrompt) {
            clearInterval(check);
            promptInstall(banner);
          } else if (attempts >= 15) {
            clearInterval(check);
            alert('Use the browser menu to install the app');
            banner.remove();
          }
        }, 200);
      });
    }

    var bannerTimeout = null;
    window.addEventListener('beforeinstallprompt', function() {
      if (showInstallPrompt && !isStandalone && !document.getElementById('pwa-install-banner')) {
        if (bannerTimeout) clearTimeout(bannerTimeout);
        setTimeout(createInstallBanner, 1000);
      }
    });

    if (showInstallPrompt && !isStandalone) {
      bannerTimeout = setTimeout(createInstallBanner, isIOS ? 3000 : 4000);
    }

    window.addEventListener('appinstalled', function() {
      var banner = document.getElementById('pwa-install-banner');
      if (banner) banner.remove();
    });
  </script>"#;

/// Service worker registration, update notification and install banner
pub fn pwa_script(page: &AiPage, base: &str) -> String {
    PWA_SCRIPT_TEMPLATE
        .replace("{{SW_URL}}", &js_string(&format!("{base}/sw.js")))
        .replace("{{THEME_COLOR}}", &js_string(theme_color(page)))
        .replace("{{BACKGROUND_COLOR}}", &js_string(background_color(page)))
        .replace(
            "{{SHOW_INSTALL_PROMPT}}",
            if page.shows_install_prompt() { "true" } else { "false" },
        )
        .replace("{{APP_NAME}}", &js_string(&attr(app_name(page))))
        .replace("{{ICON_URL}}", &js_string(&attr(icon_url(page).unwrap_or_default())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::pages::types::fixtures::page;

    fn domain(slug: Option<&str>, root: bool) -> CustomDomain {
        CustomDomain {
            domain: "shop.example.com".into(),
            slug: slug.map(Into::into),
            is_root_domain: root,
            page_id: "00000000-0000-0000-0000-000000000001".into(),
            status: "ACTIVE".into(),
        }
    }

    #[test]
    fn test_asset_base() {
        assert_eq!(asset_base("coffee", None), "/coffee");
        assert_eq!(asset_base("root", Some(&domain(None, true))), "/root");
        assert_eq!(asset_base("menu", Some(&domain(Some("menu"), false))), "/menu");
        assert_eq!(asset_base("other", Some(&domain(None, false))), "/other");
    }

    #[test]
    fn test_disabled_pwa_has_no_tags() {
        assert_eq!(pwa_tags(&page("coffee"), "/coffee"), "");
    }

    #[test]
    fn test_icon_fallback_chain() {
        let mut p = page("coffee");
        p.pwa_enabled = true;
        assert!(pwa_tags(&p, "/coffee").contains(r#"href="/default-pwa-icon.png""#));

        p.favicon_url = Some("/favicon.png".into());
        assert!(pwa_tags(&p, "/coffee").contains(r#"<link rel="apple-touch-icon" href="/favicon.png">"#));

        p.pwa_icon_url = Some("/icon.png".into());
        assert!(pwa_tags(&p, "/coffee").contains(r#"<link rel="apple-touch-icon" href="/icon.png">"#));
    }

    #[test]
    fn test_tags_use_asset_base() {
        let mut p = page("coffee");
        p.pwa_enabled = true;
        p.pwa_theme_color = Some("#ff0000".into());
        let tags = pwa_tags(&p, "/root");
        assert!(tags.contains(r#"<link rel="manifest" href="/root/manifest.json">"#));
        assert!(tags.contains(r##"<meta name="theme-color" content="#ff0000">"##));
        assert!(tags.contains(r#"<meta name="apple-mobile-web-app-title" content="Coffee Shop">"#));
    }

    #[test]
    fn test_script_placeholders_filled() {
        let mut p = page("coffee");
        p.pwa_enabled = true;
        p.pwa_name = Some("Joe's Coffee".into());
        p.pwa_show_install_prompt = Some(false);
        let script = pwa_script(&p, "/coffee");
        assert!(!script.contains("{{"));
        assert!(script.contains("register('/coffee/sw.js')"));
        assert!(script.contains("var showInstallPrompt = false;"));
        assert!(script.contains("var pwaName = 'Joe&#39;s Coffee';"));
    }

    #[test]
    fn test_short_name_truncates_title() {
        let mut p = page("coffee");
        p.title = "A very long coffee shop name".into();
        assert_eq!(short_name(&p), "A very long ");
        p.pwa_short_name = Some("Coffee".into());
        assert_eq!(short_name(&p), "Coffee");
    }
}
