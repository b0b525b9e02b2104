/// Stylesheet rendered inside the widget root.
///
/// Everything is scoped under `.cw-root` and marked
/// `!important` so host-page rules cannot leak in.
pub const WIDGET_STYLES: &str = r#"
.cw-root {
  position: fixed !important;
  bottom: 30px !important;
  right: 30px !important;
  z-index: 9999 !important;
  font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, 'Helvetica Neue', Arial, sans-serif !important;
}

.cw-root .cw-toggle {
  position: fixed !important;
  bottom: 30px !important;
  right: 30px !important;
  width: 60px !important;
  height: 60px !important;
  border-radius: 50% !important;
  background: linear-gradient(135deg, #00A859 0%, #008F4D 100%) !important;
  border: none !important;
  cursor: pointer !important;
  box-shadow: 0 4px 12px rgba(0, 168, 89, 0.4) !important;
  display: flex !important;
  flex-direction: column !important;
  align-items: center !important;
  justify-content: center !important;
  transition: all 0.3s ease !important;
  z-index: 10000 !important;
}

.cw-root .cw-toggle:hover {
  transform: scale(1.05) !important;
  box-shadow: 0 6px 16px rgba(0, 168, 89, 0.5) !important;
}

.cw-root .cw-toggle span {
  color: white !important;
  font-size: 12px !important;
  margin-top: 2px !important;
  font-weight: 600 !important;
}

.cw-root .cw-panel {
  position: fixed !important;
  bottom: 100px !important;
  right: 30px !important;
  width: 380px !important;
  height: 500px !important;
  background: white !important;
  border-radius: 16px !important;
  box-shadow: 0 8px 32px rgba(0, 0, 0, 0.15) !important;
  display: none !important;
  flex-direction: column !important;
  z-index: 9999 !important;
  overflow: hidden !important;
}

.cw-root .cw-panel.active {
  display: flex !important;
  animation: cw-slide-in 0.3s ease !important;
}

.cw-root .cw-panel.expanded {
  width: min(720px, calc(100vw - 60px)) !important;
  height: calc(100vh - 130px) !important;
}

@keyframes cw-slide-in {
  from { opacity: 0; transform: translateY(20px); }
  to { opacity: 1; transform: translateY(0); }
}

.cw-root .cw-header {
  background: linear-gradient(135deg, #00A859 0%, #008F4D 100%) !important;
  color: white !important;
  padding: 20px !important;
  display: flex !important;
  justify-content: space-between !important;
  align-items: center !important;
}

.cw-root .cw-header-left {
  display: flex !important;
  align-items: center !important;
  gap: 12px !important;
}

.cw-root .cw-logo {
  width: 45px !important;
  height: 45px !important;
  border-radius: 50% !important;
  background: white !important;
  padding: 2px !important;
  object-fit: contain !important;
}

.cw-root .cw-header-info h3 {
  margin: 0 !important;
  font-size: 16px !important;
  font-weight: 600 !important;
}

.cw-root .cw-status {
  margin: 0 !important;
  font-size: 12px !important;
  opacity: 0.9 !important;
  display: flex !important;
  align-items: center !important;
  gap: 6px !important;
}

.cw-root .cw-status-dot {
  width: 8px !important;
  height: 8px !important;
  border-radius: 50% !important;
  display: inline-block !important;
}

.cw-root .cw-header-actions {
  display: flex !important;
  gap: 4px !important;
}

.cw-root .cw-icon-btn {
  background: none !important;
  border: none !important;
  color: white !important;
  font-size: 22px !important;
  cursor: pointer !important;
  width: 30px !important;
  height: 30px !important;
  display: flex !important;
  align-items: center !important;
  justify-content: center !important;
  border-radius: 50% !important;
  transition: background 0.2s !important;
}

.cw-root .cw-icon-btn:hover {
  background: rgba(255, 255, 255, 0.2) !important;
}

.cw-root .cw-messages {
  flex: 1 !important;
  overflow-y: auto !important;
  padding: 20px !important;
  background: #f8f9fa !important;
}

.cw-root .cw-message {
  display: flex !important;
  margin-bottom: 16px !important;
  animation: cw-fade-in 0.3s ease !important;
}

@keyframes cw-fade-in {
  from { opacity: 0; }
  to { opacity: 1; }
}

.cw-root .cw-bot {
  justify-content: flex-start !important;
}

.cw-root .cw-user {
  justify-content: flex-end !important;
}

.cw-root .cw-content {
  max-width: 80% !important;
  padding: 12px 16px !important;
  border-radius: 12px !important;
  font-size: 14px !important;
  line-height: 1.5 !important;
  word-wrap: break-word !important;
}

.cw-root .cw-bot .cw-content {
  background: white !important;
  color: #333 !important;
  border-bottom-left-radius: 4px !important;
  box-shadow: 0 2px 4px rgba(0, 0, 0, 0.05) !important;
}

.cw-root .cw-user .cw-content {
  background: linear-gradient(135deg, #00A859 0%, #008F4D 100%) !important;
  color: white !important;
  border-bottom-right-radius: 4px !important;
}

.cw-root .cw-content a {
  color: #00A859 !important;
  text-decoration: underline !important;
}

.cw-root .cw-user .cw-content a {
  color: white !important;
}

.cw-root .cw-content p {
  margin: 0 0 8px 0 !important;
}

.cw-root .cw-content p:last-child {
  margin: 0 !important;
}

.cw-root .cw-content ul {
  margin: 0 !important;
  padding-left: 20px !important;
}

.cw-root .cw-content li {
  margin: 4px 0 !important;
}

.cw-root .cw-image {
  padding: 4px !important;
  display: flex !important;
  flex-direction: column !important;
  align-items: flex-end !important;
  gap: 4px !important;
}

.cw-root .cw-image img {
  max-width: 200px !important;
  max-height: 200px !important;
  border-radius: 8px !important;
  display: block !important;
}

.cw-root .cw-image.pending img {
  opacity: 0.6 !important;
}

.cw-root .cw-image.failed img {
  opacity: 0.4 !important;
  outline: 2px solid #ef4444 !important;
}

.cw-root .cw-image-state {
  font-size: 11px !important;
  color: #666 !important;
}

.cw-root .cw-image.failed .cw-image-state {
  color: #ef4444 !important;
}

.cw-root .cw-typing {
  display: flex !important;
  gap: 4px !important;
  padding: 12px 16px !important;
}

.cw-root .cw-typing span {
  width: 8px !important;
  height: 8px !important;
  background: #999 !important;
  border-radius: 50% !important;
  animation: cw-typing 1.4s infinite ease-in-out !important;
}

.cw-root .cw-typing span:nth-child(1) {
  animation-delay: -0.32s !important;
}

.cw-root .cw-typing span:nth-child(2) {
  animation-delay: -0.16s !important;
}

@keyframes cw-typing {
  0%, 80%, 100% { transform: scale(0.6); opacity: 0.5; }
  40% { transform: scale(1); opacity: 1; }
}

.cw-root .cw-input-area {
  padding: 16px !important;
  background: white !important;
  border-top: 1px solid #e8e8e8 !important;
  display: flex !important;
  gap: 12px !important;
  align-items: flex-end !important;
}

.cw-root .cw-input {
  flex: 1 !important;
  border: 1px solid #d9d9d9 !important;
  border-radius: 8px !important;
  padding: 10px 12px !important;
  font-size: 14px !important;
  resize: none !important;
  outline: none !important;
  transition: border-color 0.2s !important;
  font-family: inherit !important;
  max-height: 100px !important;
}

.cw-root .cw-input:focus {
  border-color: #00A859 !important;
}

.cw-root .cw-file-input {
  display: none !important;
}

.cw-root .cw-attach,
.cw-root .cw-send {
  width: 40px !important;
  height: 40px !important;
  border-radius: 8px !important;
  border: none !important;
  cursor: pointer !important;
  display: flex !important;
  align-items: center !important;
  justify-content: center !important;
  transition: all 0.2s !important;
}

.cw-root .cw-attach {
  background: #f0f0f0 !important;
  color: #00A859 !important;
  font-size: 18px !important;
}

.cw-root .cw-send {
  background: linear-gradient(135deg, #00A859 0%, #008F4D 100%) !important;
  color: white !important;
}

.cw-root .cw-send:hover:not(:disabled) {
  transform: scale(1.05) !important;
  box-shadow: 0 2px 8px rgba(0, 168, 89, 0.4) !important;
}

.cw-root .cw-send:disabled,
.cw-root .cw-attach:disabled {
  opacity: 0.5 !important;
  cursor: not-allowed !important;
}

@media (max-width: 480px) {
  .cw-root {
    bottom: 20px !important;
    right: 20px !important;
  }

  .cw-root .cw-toggle {
    width: 55px !important;
    height: 55px !important;
    bottom: 20px !important;
    right: 20px !important;
  }

  .cw-root .cw-panel,
  .cw-root .cw-panel.expanded {
    width: calc(100vw - 40px) !important;
    height: calc(100vh - 120px) !important;
    bottom: 80px !important;
    right: 20px !important;
    border-radius: 12px !important;
  }

  .cw-root .cw-header {
    padding: 16px !important;
  }

  .cw-root .cw-logo {
    width: 40px !important;
    height: 40px !important;
  }

  .cw-root .cw-header-info h3 {
    font-size: 14px !important;
  }
}
"#;
