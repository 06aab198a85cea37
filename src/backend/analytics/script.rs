//! Client-side analytics beacon injected into rendered pages

use super::types::PageType;

/// Beacon template; `{{PAGE_ID}}`, `{{PAGE_TYPE}}` and `{{USER_ID}}` are
/// substituted per page
pub const ANALYTICS_TEMPLATE: &str = r#"
<script>
(function() {
  'use strict';

  var ANALYTICS_ENDPOINT = '/api/analytics/track';
  var PAGE_ID = '{{PAGE_ID}}';
  var PAGE_TYPE = '{{PAGE_TYPE}}';
  var USER_ID = '{{USER_ID}}';

  function detectDevice() {
    var ua = navigator.userAgent;
    var isMobile = /Mobile|Android|iPhone|iPad|iPod|BlackBerry|IEMobile|Opera Mini/i.test(ua);
    var isTablet = /iPad|Android(?!.*Mobile)|Tablet/i.test(ua);
    return {
      device: isMobile ? 'mobile' : (isTablet ? 'tablet' : 'desktop'),
      isMobile: isMobile,
      isTablet: isTablet,
      isDesktop: !isMobile && !isTablet
    };
  }

  function detectOS() {
    var ua = navigator.userAgent;
    var m;
    if (/Windows NT 10/i.test(ua)) return { os: 'Windows', osVersion: '10' };
    if (/Windows/i.test(ua)) return { os: 'Windows', osVersion: '' };
    if ((m = ua.match(/iPhone OS ([\d_]+)/i))) return { os: 'iOS', osVersion: m[1].replace(/_/g, '.') };
    if ((m = ua.match(/Mac OS X ([\d._]+)/i))) return { os: 'macOS', osVersion: m[1].replace(/_/g, '.') };
    if ((m = ua.match(/Android ([\d.]+)/i))) return { os: 'Android', osVersion: m[1] };
    if (/Linux/i.test(ua)) return { os: 'Linux', osVersion: '' };
    return { os: 'Unknown', osVersion: '' };
  }

  function detectBrowser() {
    var ua = navigator.userAgent;
    var m;
    if ((m = ua.match(/Edg\/([\d.]+)/i))) return { browser: 'Edge', browserVersion: m[1] };
    if ((m = ua.match(/Chrome\/([\d.]+)/i))) return { browser: 'Chrome', browserVersion: m[1] };
    if ((m = ua.match(/Firefox\/([\d.]+)/i))) return { browser: 'Firefox', browserVersion: m[1] };
    if ((m = ua.match(/Version\/([\d.]+).*Safari/i))) return { browser: 'Safari', browserVersion: m[1] };
    return { browser: 'Unknown', browserVersion: '' };
  }

  function referrerDomain() {
    if (!document.referrer) return null;
    try { return new URL(document.referrer).hostname; } catch (e) { return null; }
  }

  function visitorId() {
    var str = navigator.userAgent + screen.width + 'x' + screen.height;
    var hash = 0;
    for (var i = 0; i < str.length; i++) {
      hash = ((hash << 5) - hash) + str.charCodeAt(i);
      hash = hash & hash;
    }
    return 'v_' + Math.abs(hash).toString(36);
  }

  var params = new URLSearchParams(window.location.search);
  var device = detectDevice();
  var os = detectOS();
  var browser = detectBrowser();

  var data = {
    pageId: PAGE_ID,
    pageType: PAGE_TYPE,
    userId: USER_ID || null,
    sessionId: 's_' + Date.now() + '_' + Math.random().toString(36).slice(2, 11),
    visitorId: visitorId(),
    screenWidth: screen.width,
    screenHeight: screen.height,
    viewportWidth: window.innerWidth,
    viewportHeight: window.innerHeight,
    colorDepth: screen.colorDepth,
    pixelRatio: window.devicePixelRatio || 1,
    device: device.device,
    isMobile: device.isMobile,
    isTablet: device.isTablet,
    isDesktop: device.isDesktop,
    os: os.os,
    osVersion: os.osVersion,
    browser: browser.browser,
    browserVersion: browser.browserVersion,
    language: navigator.language || null,
    referrer: document.referrer || null,
    referrerDomain: referrerDomain(),
    utmSource: params.get('utm_source'),
    utmMedium: params.get('utm_medium'),
    utmCampaign: params.get('utm_campaign'),
    utmTerm: params.get('utm_term'),
    utmContent: params.get('utm_content'),
    pageLoadTime: 0,
    userAgent: navigator.userAgent,
    previousPage: document.referrer || null
  };

  var sent = false;
  var startedAt = Date.now();

  window.addEventListener('load', function() {
    if (sent) return;
    sent = true;
    var elapsed = Date.now() - startedAt;
    data.pageLoadTime = (elapsed < 0 || elapsed > 60000) ? 0 : elapsed;
    fetch(ANALYTICS_ENDPOINT, {
      method: 'POST',
      headers: { 'Content-Type': 'application/json' },
      body: JSON.stringify(data)
    }).catch(function(err) { console.warn('Analytics request failed:', err); });
  });
})();
</script>
"#;

/// Beacon script for one page
pub fn analytics_script(page_id: &str, page_type: PageType, user_id: Option<&str>) -> String {
    ANALYTICS_TEMPLATE
        .replace("{{PAGE_ID}}", &js_string(page_id))
        .replace("{{PAGE_TYPE}}", page_type.as_str())
        .replace("{{USER_ID}}", &js_string(user_id.unwrap_or_default()))
}

/// Escape a value for a single-quoted JavaScript string inside `<script>`
pub fn js_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '<' => out.push_str("\\x3C"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders_are_replaced() {
        let script = analytics_script("page-1", PageType::AiPage, Some("user-9"));
        assert!(script.contains("var PAGE_ID = 'page-1';"));
        assert!(script.contains("var PAGE_TYPE = 'AI_PAGE';"));
        assert!(script.contains("var USER_ID = 'user-9';"));
        assert!(!script.contains("{{"));
    }

    #[test]
    fn test_missing_user_is_empty() {
        let script = analytics_script("p", PageType::Biolink, None);
        assert!(script.contains("var USER_ID = '';"));
    }

    #[test]
    fn test_js_string_escapes_script_breakout() {
        assert_eq!(js_string("a'b</script>"), "a\\'b\\x3C/script>");
    }
}
