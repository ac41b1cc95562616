use esomchat_types::WidgetConfig;

/// Id of the injected `<style>` element
pub const STYLE_ELEMENT_ID: &str = "esom-chatbot-styles";

/// Stylesheet for the widget, themed from the configuration
pub fn stylesheet(config: &WidgetConfig) -> String {
    let side = config.position.css_side();
    let primary = &config.primary_color;
    let accent = &config.accent_color;
    let font_size = &config.font_size;

    format!(
        r#"
.esom-chatbot-container {{
    position: fixed;
    bottom: 20px;
    {side}: 20px;
    z-index: 1000;
    font-family: 'Montserrat', 'Outfit', Arial, sans-serif;
    font-size: {font_size};
    line-height: 1.5;
}}
.esom-chat-button {{
    width: 60px;
    height: 60px;
    border-radius: 50%;
    background-color: {primary};
    color: white;
    display: flex;
    justify-content: center;
    align-items: center;
    cursor: pointer;
    box-shadow: 0 2px 10px rgba(0, 0, 0, 0.2);
    transition: all 0.3s ease;
}}
.esom-chat-button:hover {{ transform: scale(1.05); }}
.esom-chat-window {{
    position: absolute;
    bottom: 80px;
    {side}: 0;
    width: 350px;
    height: 500px;
    background-color: white;
    border-radius: 10px;
    box-shadow: 0 5px 20px rgba(0, 0, 0, 0.15);
    display: flex;
    flex-direction: column;
    overflow: hidden;
    transform-origin: bottom {side};
    transform: scale(0);
    opacity: 0;
    transition: transform 0.3s ease, opacity 0.3s ease;
}}
.esom-chat-window.open {{ transform: scale(1); opacity: 1; }}
.esom-chat-header {{
    display: flex;
    align-items: center;
    padding: 15px;
    background-color: {primary};
    color: white;
    font-weight: bold;
}}
.esom-chat-header-logo {{
    width: 30px;
    height: 30px;
    margin-right: 10px;
    display: flex;
    align-items: center;
    justify-content: center;
}}
.esom-chat-header-logo img {{ width: 100%; height: 100%; object-fit: contain; }}
.esom-chat-default-avatar {{
    width: 30px;
    height: 30px;
    border-radius: 50%;
    background-color: {accent};
    color: white;
    display: flex;
    align-items: center;
    justify-content: center;
    font-weight: bold;
}}
.esom-chat-header-title {{ flex: 1; font-size: 16px; }}
.esom-chat-header-close {{ font-size: 24px; cursor: pointer; height: 24px; line-height: 24px; }}
.esom-chat-messages {{
    flex: 1;
    overflow-y: auto;
    padding: 15px;
    display: flex;
    flex-direction: column;
}}
.esom-chat-message {{
    margin-bottom: 15px;
    display: flex;
    align-items: flex-start;
    animation: fadeIn 0.5s;
}}
@keyframes fadeIn {{
    from {{ opacity: 0; transform: translateY(10px); }}
    to {{ opacity: 1; transform: translateY(0); }}
}}
.esom-chat-message-avatar {{
    width: 30px;
    height: 30px;
    border-radius: 50%;
    margin-right: 10px;
    display: flex;
    align-items: center;
    justify-content: center;
    flex-shrink: 0;
}}
.esom-chat-message-avatar img {{ width: 100%; height: 100%; object-fit: cover; border-radius: 50%; }}
.esom-chat-message.bot .esom-chat-message-avatar {{ background-color: {primary}; color: white; }}
.esom-chat-message.user .esom-chat-message-avatar {{ background-color: #e0e0e0; color: #333; }}
.esom-chat-message-content {{
    padding: 12px 15px;
    border-radius: 18px;
    max-width: 80%;
    word-wrap: break-word;
}}
.esom-chat-message.bot .esom-chat-message-content {{
    background-color: #f0f0f0;
    color: #333;
    border-bottom-left-radius: 5px;
}}
.esom-chat-message.user .esom-chat-message-content {{
    background-color: {primary};
    color: white;
    margin-left: auto;
    border-bottom-right-radius: 5px;
}}
.esom-chat-message.user {{ flex-direction: row-reverse; }}
.esom-chat-message.user .esom-chat-message-avatar {{ margin-right: 0; margin-left: 10px; }}
.esom-chat-input-area {{
    padding: 15px;
    display: flex;
    background-color: #f9f9f9;
    border-top: 1px solid #eee;
}}
.esom-chat-input {{
    flex: 1;
    padding: 12px 15px;
    border: 1px solid #ddd;
    border-radius: 20px;
    font-size: 14px;
    outline: none;
}}
.esom-chat-send-button {{
    width: 40px;
    height: 40px;
    margin-left: 10px;
    background-color: {primary};
    color: white;
    border: none;
    border-radius: 50%;
    cursor: pointer;
    display: flex;
    justify-content: center;
    align-items: center;
    transition: background-color 0.3s;
}}
.esom-chat-send-button:hover {{ background-color: {accent}; }}
.esom-chat-typing {{
    display: flex;
    padding: 10px;
    background-color: #f0f0f0;
    border-radius: 18px;
    margin-bottom: 15px;
    align-items: center;
    animation: fadeIn 0.5s;
}}
.esom-chat-typing-dot {{
    width: 8px;
    height: 8px;
    background-color: #666;
    border-radius: 50%;
    margin: 0 2px;
    opacity: 0.6;
    animation: typing 1.2s infinite;
}}
.esom-chat-typing-dot:nth-child(1) {{ animation-delay: 0s; }}
.esom-chat-typing-dot:nth-child(2) {{ animation-delay: 0.2s; }}
.esom-chat-typing-dot:nth-child(3) {{ animation-delay: 0.4s; }}
@keyframes typing {{
    0%, 100% {{ transform: translateY(0); }}
    50% {{ transform: translateY(-5px); }}
}}
.esom-chat-sources {{ font-size: 12px; color: #666; margin-top: 5px; font-style: italic; }}
.esom-chat-glossary-term {{ font-weight: bold; margin-top: 10px; }}
.esom-chat-market-data {{
    font-size: 13px;
    background-color: rgba(240, 173, 78, 0.1);
    padding: 8px 12px;
    border-radius: 8px;
    margin-top: 10px;
    border-left: 3px solid {accent};
}}
@media (max-width: 480px) {{
    .esom-chat-window {{
        width: calc(100vw - 40px);
        height: 60vh;
        bottom: 80px;
        {side}: 20px;
    }}
    .esom-chat-message-content {{ max-width: 85%; }}
}}
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use esomchat_types::Position;

    #[test]
    fn test_stylesheet_uses_theme() {
        let config = WidgetConfig {
            primary_color: "#112233".to_string(),
            accent_color: "#aabbcc".to_string(),
            font_size: "16px".to_string(),
            ..Default::default()
        };
        let css = stylesheet(&config);
        assert!(css.contains("background-color: #112233;"));
        assert!(css.contains("border-left: 3px solid #aabbcc;"));
        assert!(css.contains("font-size: 16px;"));
        assert!(css.contains("right: 20px;"));
    }

    #[test]
    fn test_stylesheet_left_corner() {
        let config = WidgetConfig {
            position: Position::Left,
            ..Default::default()
        };
        let css = stylesheet(&config);
        assert!(css.contains("left: 20px;"));
        assert!(css.contains("transform-origin: bottom left;"));
        assert!(!css.contains("right: 20px;"));
    }
}
